//! Settlement solver
//!
//! Turns a balance vector into a list of transfers by repeatedly pairing the
//! largest remaining creditor with the largest remaining debtor. Balances are
//! rounded to whole cents once, up front, in a way that keeps their sum at
//! zero; netting then runs on exact cents, so rounding never compounds across
//! transfers. The result leaves every balance within a cent of zero but is not
//! guaranteed to use the fewest possible transfers.

use tracing::debug;

use super::balance::BalanceVector;
use super::tolerance::is_settled;
use crate::models::{Money, PersonId, Transfer};

/// Produce the transfers that settle `balances`
///
/// A vector whose balances are all under [`SETTLEMENT_EPSILON`] is already
/// settled and yields nothing. Otherwise every person with a positive or
/// negative balance takes part, however small. Ties between equal balances go
/// to the smallest person id, so the output is fully determined by the input.
///
/// [`SETTLEMENT_EPSILON`]: super::tolerance::SETTLEMENT_EPSILON
pub fn settle(balances: &BalanceVector) -> Vec<Transfer> {
    if balances.iter().all(|(_, balance)| is_settled(balance)) {
        return Vec::new();
    }

    let cents = to_cents(balances);
    // Both lists stay in ascending id order; removals preserve it.
    let mut creditors: Vec<(PersonId, i64)> =
        cents.iter().copied().filter(|&(_, c)| c > 0).collect();
    let mut debtors: Vec<(PersonId, i64)> = cents
        .iter()
        .filter(|&&(_, c)| c < 0)
        .map(|&(id, c)| (id, -c))
        .collect();

    let mut transfers = Vec::new();

    while !creditors.is_empty() && !debtors.is_empty() {
        let ci = largest(&creditors);
        let di = largest(&debtors);
        let (creditor, credit) = creditors[ci];
        let (debtor, debt) = debtors[di];

        let amount = credit.min(debt);
        debug!(%debtor, %creditor, cents = amount, "settling pair");
        transfers.push(Transfer::new(debtor, creditor, Money::from_cents(amount)));

        creditors[ci].1 -= amount;
        debtors[di].1 -= amount;

        if creditors[ci].1 == 0 {
            creditors.remove(ci);
        }
        if debtors[di].1 == 0 {
            debtors.remove(di);
        }
    }

    transfers
}

/// Round each balance to whole cents so the results still sum to zero
///
/// Every balance is floored, then the cents lost to flooring go back one each
/// to the balances with the largest fractional remainder (smallest id on
/// ties). No balance moves by a full cent.
fn to_cents(balances: &BalanceVector) -> Vec<(PersonId, i64)> {
    let mut floored: Vec<(PersonId, i64, f64)> = balances
        .iter()
        .map(|(id, balance)| {
            let scaled = balance * 100.0;
            let floor = scaled.floor();
            (id, floor as i64, scaled - floor)
        })
        .collect();

    let lost: i64 = -floored.iter().map(|&(_, c, _)| c).sum::<i64>();
    let lost = usize::try_from(lost).unwrap_or(0).min(floored.len());

    let mut by_remainder: Vec<usize> = (0..floored.len()).collect();
    by_remainder.sort_by(|&i, &j| floored[j].2.total_cmp(&floored[i].2));
    for &i in by_remainder.iter().take(lost) {
        floored[i].1 += 1;
    }

    floored.into_iter().map(|(id, c, _)| (id, c)).collect()
}

/// Index of the largest remaining amount; the first (smallest id) wins ties
fn largest(parties: &[(PersonId, i64)]) -> usize {
    let mut best = 0;
    for (i, &(_, amount)) in parties.iter().enumerate().skip(1) {
        if amount > parties[best].1 {
            best = i;
        }
    }
    best
}

/// Apply transfers to a balance vector: each debtor's balance rises and each
/// creditor's falls by the transferred amount
pub fn apply_transfers(balances: &BalanceVector, transfers: &[Transfer]) -> BalanceVector {
    let mut remaining = balances.clone();
    for transfer in transfers {
        let amount = transfer.amount.as_f64();
        *remaining.entry_mut(transfer.debtor) += amount;
        *remaining.entry_mut(transfer.creditor) -= amount;
    }
    remaining
}
