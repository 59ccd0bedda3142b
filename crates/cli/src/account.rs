//! `pwatch signup` / `pwatch login`.

use pricewatch_io::{Account, AccountStore};

use crate::{CliError, Context};

pub fn account_store(ctx: &Context) -> AccountStore {
    AccountStore::new(&ctx.data_dir, ctx.settings.default_country.clone())
}

/// Verify credentials; every ledger command goes through this first.
pub fn authenticate(ctx: &Context, email: &str, password: &str) -> Result<Account, CliError> {
    account_store(ctx)
        .verify(email, password)
        .map_err(CliError::store)
}

pub fn cmd_signup(
    ctx: &Context,
    name: &str,
    email: &str,
    password: &str,
    country: &str,
) -> Result<(), CliError> {
    let currencies = ctx.settings.currency_table();
    if !currencies.is_known(country) {
        let known: Vec<&str> = currencies.countries().collect();
        return Err(CliError::usage(format!("unsupported country: \"{}\"", country.trim()))
            .with_hint(format!("one of: {}", known.join(", "))));
    }

    let account = account_store(ctx)
        .register(name, email, password, country)
        .map_err(CliError::store)?;

    println!(
        "Account created for {}! Currency: {}",
        account.name,
        currencies.symbol_for(&account.country)
    );
    Ok(())
}

pub fn cmd_login(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let account = authenticate(ctx, email, password)?;
    let symbol = ctx.settings.currency_table().symbol_for(&account.country).to_string();
    println!(
        "Welcome back, {}! Currency: {} ({})",
        account.name, symbol, account.country
    );
    Ok(())
}
