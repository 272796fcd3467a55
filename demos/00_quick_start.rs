/// quick start - originate a loan and print its schedule
use loanbook_rs::{
    BorrowerType, EventStore, LoanRecord, Money, PaymentFrequency, Rate, SafeTimeProvider,
    TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut events = EventStore::new();

    // a 100,000 tractor loan at 12%/year, repaid monthly over a year
    let loan = LoanRecord::builder()
        .principal(Money::from_major(100_000))
        .rate(Rate::from_percentage(dec!(12)))
        .term_months(12)
        .frequency(PaymentFrequency::Monthly)
        .borrower(BorrowerType::Employee, "EMP-042")
        .purpose("tractor purchase")
        .sequence(1)
        .originate(&time, &mut events)?;

    println!("loan {} for {}", loan.loan_number, loan.terms.principal);
    println!("installment: {}", loan.schedule.payment_amount.round_dp(2));
    println!("total interest: {}", loan.schedule.total_interest.round_dp(2));

    for entry in &loan.schedule.entries {
        println!(
            "  #{:<2} due {}  payment {:>10}  principal {:>10}  interest {:>8}  balance {:>10}",
            entry.period_number,
            entry.due_date,
            entry.payment_amount.round_dp(2),
            entry.principal_amount.round_dp(2),
            entry.interest_amount.round_dp(2),
            entry.remaining_balance.round_dp(2),
        );
    }

    // summary view as the API layer would serve it
    println!("{}", loan.view().to_json_pretty()?);

    Ok(())
}
