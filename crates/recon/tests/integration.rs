use pricewatch_recon::{
    normalize, parse_observation_arg, reconcile, Ledger, Observation, PriceBounds, PriceChange,
    PriceRecord, ReconError,
};
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn batch(args: &[&str]) -> Vec<Observation> {
    let raw = args.iter().map(|a| parse_observation_arg(a).unwrap()).collect();
    normalize(raw, &PriceBounds::default()).unwrap()
}

// -------------------------------------------------------------------------
// Week-over-week scenario
// -------------------------------------------------------------------------

#[test]
fn three_weeks_of_groceries() {
    // Week 1: everything new
    let week1 = reconcile(
        Ledger::new(),
        &batch(&["milk=5.00:4.50", "eggs=3.00:2.00", " bread =2.20"]),
    );
    assert!(week1.messages.iter().all(|m| m.kind == PriceChange::Unchanged));
    assert_eq!(week1.alerts.len(), 1, "bread defaults target to its price");
    assert_eq!(week1.alerts[0].item, "bread");

    // Week 2: milk drops, eggs rise, bread not re-entered
    let week2 = reconcile(week1.ledger.clone(), &batch(&["milk=4.00:4.50", "eggs=3.50:2.00"]));
    let kinds: Vec<_> = week2.messages.iter().map(|m| (m.item.as_str(), m.kind)).collect();
    assert_eq!(
        kinds,
        vec![("milk", PriceChange::Decreased), ("eggs", PriceChange::Increased)]
    );
    assert_eq!(week2.alerts.len(), 1);
    assert_eq!(week2.alerts[0].item, "milk");
    assert_eq!(week2.ledger.get("bread"), week1.ledger.get("bread"));
    assert_eq!(
        week2.ledger.get("eggs"),
        Some(&PriceRecord {
            item: "eggs".into(),
            current_price: d("3.50"),
            last_price: d("3.00"),
            target_price: d("2.00"),
        })
    );

    // Week 3: same milk price, alert fires again
    let week3 = reconcile(week2.ledger.clone(), &batch(&["milk=4.00:4.50"]));
    assert_eq!(week3.messages[0].kind, PriceChange::Unchanged);
    assert_eq!(week3.alerts.len(), 1);
    assert_eq!(week3.ledger.get("milk").unwrap().last_price, d("4.00"));
    assert_eq!(week3.summary.tracked, 3);
}

#[test]
fn record_change_reflects_last_update() {
    let ledger: Ledger = [PriceRecord::first_seen("tea", d("4"), d("3"))].into_iter().collect();
    let out = reconcile(ledger, &batch(&["tea=3.5:3"]));
    let tea = out.ledger.get("tea").unwrap();
    assert_eq!(tea.change(), PriceChange::Decreased);
    assert!(!tea.target_reached());
}

#[test]
fn invalid_batch_never_reaches_reconcile() {
    let raw = vec![
        Observation::new("milk", d("4"), d("4")),
        Observation::new("caviar", d("20000"), d("1")),
    ];
    let err = normalize(raw, &PriceBounds::default()).unwrap_err();
    assert!(matches!(err, ReconError::PriceOutOfRange { ref item, .. } if item == "caviar"));
}

#[test]
fn summary_serializes_for_reports() {
    let out = reconcile(Ledger::new(), &batch(&["milk=1:2"]));
    let json = serde_json::to_value(&out.summary).unwrap();
    assert_eq!(json["observed"], 1);
    assert_eq!(json["unchanged"], 1);
    assert_eq!(json["alerts"], 1);

    let msg = serde_json::to_value(&out.messages[0]).unwrap();
    assert_eq!(msg["kind"], "unchanged");
    assert_eq!(msg["current"], "1");
}
