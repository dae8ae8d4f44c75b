//! UTXO chain support for the Omni bridge SDK.
//!
//! Bitcoin and Zcash settle through NEAR connector contracts holding a
//! shared UTXO set. Outbound withdrawals are planned here: coin selection
//! under each chain's fee model, dust absorption, change discipline, and an
//! input-count cap. Inbound deposits are proven with SPV Merkle paths.
//!
//! # Modules
//!
//! - [`types`] - UTXOs, planned outputs, withdrawal plans
//! - [`fee`] - Bitcoin sat/vB sizing and the Zcash ZIP-317 model
//! - [`plan`] - The withdrawal planner
//! - [`script`] - Address-to-script encoding with network rejection
//! - [`spv`] - Double-sha256 Merkle paths for the connector's light client
//! - [`msg`] - The `Withdraw` message carried by `ft_transfer_call`

pub mod fee;
pub mod msg;
pub mod plan;
pub mod script;
pub mod spv;
pub mod types;

pub use plan::{PlanOptions, build_withdrawal_plan};
pub use types::{Utxo, UtxoNetwork, WithdrawalPlan};
