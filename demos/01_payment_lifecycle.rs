/// payment lifecycle - settle installments, fall overdue, catch up
use loanbook_rs::chrono::{Duration, TimeZone, Utc};
use loanbook_rs::{
    BorrowerType, EventStore, LoanRecord, Money, PaymentFrequency, Rate, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let control = time.test_control().expect("test time source");
    let mut events = EventStore::new();

    let mut loan = LoanRecord::builder()
        .principal(Money::from_major(1_200))
        .rate(Rate::from_percentage(dec!(0)))
        .term_months(12)
        .frequency(PaymentFrequency::Monthly)
        .borrower(BorrowerType::Contractor, "CTR-007")
        .sequence(1)
        .originate(&time, &mut events)?;

    println!("originated {} ({:?})", loan.loan_number, loan.status);

    // pay the first two installments on time
    let receipt = loan.apply_payment(Money::from_major(200), &time, &mut events)?;
    println!(
        "paid 200: settled periods {:?}, balance {}",
        receipt.entries_settled, loan.remaining_balance
    );

    // skip three months, the sweep flags the missed installments
    control.advance(Duration::days(92));
    let flipped = loan.mark_overdue(&time, &mut events)?;
    println!("after 92 days: {} entries overdue, status {:?}", flipped, loan.status);

    // catch up and clear the rest of the book
    loan.apply_payment(Money::from_major(1_000), &time, &mut events)?;
    println!("caught up: status {:?}, balance {}", loan.status, loan.remaining_balance);

    for event in events.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
