//! Per-chain fee models.
//!
//! Bitcoin fees scale with virtual size at a caller-supplied sat/vB rate.
//! Zcash follows ZIP-317: a flat marginal fee per logical action, where the
//! action count is the larger of the input and output counts; the caller's
//! fee rate is ignored.

/// Transaction overhead plus per-input and per-output vbytes for P2WPKH
/// spends.
const TX_OVERHEAD_VBYTES: u64 = 10;
const INPUT_VBYTES: u64 = 68;
const OUTPUT_VBYTES: u64 = 31;

/// ZIP-317 constants, in zatoshis and actions.
pub const ZIP317_MARGINAL_FEE: u64 = 5_000;
pub const ZIP317_GRACE_ACTIONS: u64 = 2;

/// Fee model selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeModel {
    /// `fee = rate * vsize`, rate in sat/vB.
    BitcoinVsize,
    /// ZIP-317 logical actions; rate input is ignored.
    Zip317,
}

impl FeeModel {
    /// Estimate the fee for a transaction shape under this model.
    pub fn estimate(&self, inputs: usize, outputs: usize, rate: u64) -> u64 {
        match self {
            FeeModel::BitcoinVsize => {
                let vsize = TX_OVERHEAD_VBYTES
                    + INPUT_VBYTES * inputs as u64
                    + OUTPUT_VBYTES * outputs as u64;
                rate * vsize
            }
            FeeModel::Zip317 => {
                let logical_actions = inputs.max(outputs) as u64;
                ZIP317_MARGINAL_FEE * logical_actions.max(ZIP317_GRACE_ACTIONS)
            }
        }
    }
}
