//! The withdrawal planner.
//!
//! Coin selection is greedy largest-first: UTXOs are added until the
//! gathered total covers amount plus the two-output fee estimate. Residue at
//! or below the dust threshold is absorbed into the fee rather than emitted
//! as an unspendable change output.

use omni_bridge_types::errors::ValidationError;

use crate::fee::FeeModel;
use crate::types::{PlannedOutput, Utxo, WithdrawalPlan};

/// Residue at or below this many satoshis is folded into the fee.
pub const DUST_THRESHOLD: u64 = 1_000;

/// Per-plan overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Cap on the number of inputs the plan may spend.
    pub max_inputs: Option<usize>,
    /// Reject withdrawals below this amount. Defaults to the dust threshold.
    pub min_withdraw: Option<u64>,
}

/// Plan a withdrawal of `amount` to `target_script`, sending any change to
/// `change_script`.
///
/// `fee_rate` is sat/vB for [`FeeModel::BitcoinVsize`] and ignored under
/// [`FeeModel::Zip317`]. The emitted inputs keep selection order
/// (largest value first).
pub fn build_withdrawal_plan(
    utxos: &[Utxo],
    amount: u64,
    target_script: Vec<u8>,
    change_script: Vec<u8>,
    fee_rate: u64,
    model: FeeModel,
    options: &PlanOptions,
) -> Result<WithdrawalPlan, ValidationError> {
    let min_withdraw = options.min_withdraw.unwrap_or(DUST_THRESHOLD);
    if amount < min_withdraw {
        return Err(ValidationError::AmountBelowMinWithdraw {
            amount: amount.into(),
            min: min_withdraw.into(),
        });
    }

    let mut sorted: Vec<&Utxo> = utxos.iter().collect();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));
    let max_inputs = options.max_inputs.unwrap_or(usize::MAX);

    let mut selected: Vec<Utxo> = Vec::new();
    let mut gathered: u64 = 0;
    let mut fee = 0;
    let mut covered = false;
    for utxo in sorted {
        if selected.len() == max_inputs {
            break;
        }
        gathered += utxo.value;
        selected.push(utxo.clone());
        fee = model.estimate(selected.len(), 2, fee_rate);
        if gathered >= amount + fee {
            covered = true;
            break;
        }
    }
    if !covered {
        return Err(ValidationError::InsufficientUtxos {
            required: u128::from(amount) + u128::from(fee),
            gathered: gathered.into(),
            max_inputs,
        });
    }

    let residue = gathered - amount - fee;
    let mut outputs = vec![PlannedOutput {
        script_pubkey: target_script,
        value: amount,
    }];
    let final_fee = if residue == 0 {
        fee
    } else if residue <= DUST_THRESHOLD {
        // Dust absorption: overpay the fee instead of emitting an
        // unspendable change output.
        fee + residue
    } else {
        outputs.push(PlannedOutput {
            script_pubkey: change_script,
            value: residue,
        });
        fee
    };

    tracing::debug!(
        inputs = selected.len(),
        outputs = outputs.len(),
        fee = final_fee,
        "Planned withdrawal"
    );

    Ok(WithdrawalPlan {
        inputs: selected,
        outputs,
        fee: final_fee,
    })
}
