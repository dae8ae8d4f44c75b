//! Static contract deployment tables.
//!
//! The SDK carries the bridge's deployed addresses keyed by network. All RPC
//! URLs are defaults and can be overridden at construction through
//! [`crate::config::BridgeConfig`]; contract addresses cannot, since they
//! are part of the bridge deployment itself.

use alloy_primitives::{Address, address};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use solana_pubkey::{Pubkey, pubkey};
use std::str::FromStr;

use omni_bridge_types::address::AccountId;
use omni_bridge_types::chain::ChainKind;

/// Bridge deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeNetwork {
    Mainnet,
    Testnet,
}

/// One EVM factory deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmDeployment {
    pub chain: ChainKind,
    pub factory: Address,
    pub chain_id: u64,
}

/// The NEAR hub deployment: locker, UTXO connectors, wrapped tokens.
#[derive(Debug, Clone)]
pub struct NearDeployment {
    pub locker: AccountId,
    pub btc_connector: AccountId,
    pub zcash_connector: AccountId,
    pub wrapped_btc: AccountId,
    pub wrapped_zec: AccountId,
    pub rpc_url: &'static str,
}

/// The Solana locker deployment and its Wormhole plumbing.
#[derive(Debug, Clone, Copy)]
pub struct SolanaDeployment {
    pub locker: Pubkey,
    pub wormhole_core: Pubkey,
    pub post_message_shim: Pubkey,
    pub rpc_url: &'static str,
}

impl SolanaDeployment {
    /// The shim's Anchor event authority PDA.
    pub fn shim_event_authority(&self) -> Pubkey {
        Pubkey::find_program_address(&[b"__event_authority"], &self.post_message_shim).0
    }
}

/// Default public endpoints for one UTXO chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtxoDeployment {
    pub esplora_url: &'static str,
    pub rpc_url: &'static str,
}

/// Everything the SDK knows about one bridge environment.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub network: BridgeNetwork,
    pub evm: Vec<EvmDeployment>,
    pub near: NearDeployment,
    pub solana: SolanaDeployment,
    pub btc: UtxoDeployment,
    pub zcash: UtxoDeployment,
    pub api_url: &'static str,
    pub wormhole_api_url: &'static str,
}

impl NetworkConfig {
    pub fn of(network: BridgeNetwork) -> &'static NetworkConfig {
        match network {
            BridgeNetwork::Mainnet => &MAINNET,
            BridgeNetwork::Testnet => &TESTNET,
        }
    }

    /// The EVM factory deployment for `chain`, if that chain is bridged on
    /// this network.
    pub fn evm_deployment(&self, chain: ChainKind) -> Option<&EvmDeployment> {
        self.evm.iter().find(|deployment| deployment.chain == chain)
    }

    /// The settlement contract a transfer from `chain` targets, as the
    /// string form the validator records.
    pub fn contract_address(&self, chain: ChainKind) -> Option<String> {
        match chain {
            ChainKind::Near => Some(self.near.locker.to_string()),
            ChainKind::Sol => Some(self.solana.locker.to_string()),
            ChainKind::Btc => Some(self.near.btc_connector.to_string()),
            ChainKind::Zcash => Some(self.near.zcash_connector.to_string()),
            evm => self
                .evm_deployment(evm)
                .map(|deployment| deployment.factory.to_string()),
        }
    }
}

fn account(id: &str) -> AccountId {
    AccountId::from_str(id).expect("static account ids are valid")
}

static MAINNET: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    network: BridgeNetwork::Mainnet,
    evm: vec![
        EvmDeployment {
            chain: ChainKind::Eth,
            factory: address!("0xe00c629afaccb0510995a2b95560e446a24c85b9"),
            chain_id: 1,
        },
        EvmDeployment {
            chain: ChainKind::Arb,
            factory: address!("0xd025b38762b4a4e36f0cde483b86cb13ea00d989"),
            chain_id: 42161,
        },
        EvmDeployment {
            chain: ChainKind::Base,
            factory: address!("0xd025b38762b4a4e36f0cde483b86cb13ea00d989"),
            chain_id: 8453,
        },
        EvmDeployment {
            chain: ChainKind::Bnb,
            factory: address!("0x3b7e6b6a66e7f1b4a7c1d6f1e58f8d8c42a97c11"),
            chain_id: 56,
        },
        EvmDeployment {
            chain: ChainKind::Pol,
            factory: address!("0x8d2a7e2c9aaf1dd1a3f2e0c0c4b5f8e1a8a6c0de"),
            chain_id: 137,
        },
    ],
    near: NearDeployment {
        locker: account("omni.bridge.near"),
        btc_connector: account("btc-connector.bridge.near"),
        zcash_connector: account("zcash-connector.bridge.near"),
        wrapped_btc: account("nbtc.bridge.near"),
        wrapped_zec: account("zec.omft.near"),
        rpc_url: "https://rpc.mainnet.near.org",
    },
    solana: SolanaDeployment {
        locker: pubkey!("dahPEoZGXfyV58JqqH85okdHmpN8U2q8owgPUXSCPxe"),
        wormhole_core: pubkey!("worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth"),
        post_message_shim: pubkey!("EtZMZM22ViKMo4r5y4Anovs3wKQ2owUmDpjygnMMcdEX"),
        rpc_url: "https://api.mainnet-beta.solana.com",
    },
    btc: UtxoDeployment {
        esplora_url: "https://blockstream.info/api",
        rpc_url: "https://bitcoin-rpc.publicnode.com",
    },
    zcash: UtxoDeployment {
        esplora_url: "https://zcashblockexplorer.com/api",
        rpc_url: "https://zec.nownodes.io",
    },
    api_url: "https://mainnet.api.bridge.nearone.org",
    wormhole_api_url: "https://api.wormholescan.io",
});

static TESTNET: Lazy<NetworkConfig> = Lazy::new(|| NetworkConfig {
    network: BridgeNetwork::Testnet,
    evm: vec![
        EvmDeployment {
            chain: ChainKind::Eth,
            factory: address!("0x68a86e0ea5b1d39f385c1326e4d493526dfe4401"),
            chain_id: 11155111,
        },
        EvmDeployment {
            chain: ChainKind::Arb,
            factory: address!("0x0c981337ffe39a555d3a40dbb32f21ad6f309e93"),
            chain_id: 421614,
        },
        EvmDeployment {
            chain: ChainKind::Base,
            factory: address!("0xa56b860017152cd296ad723e8409abd6e5d86d4d"),
            chain_id: 84532,
        },
    ],
    near: NearDeployment {
        locker: account("omni-locker.testnet"),
        btc_connector: account("btc-connector.testnet"),
        zcash_connector: account("zcash-connector.testnet"),
        wrapped_btc: account("nbtc.testnet"),
        wrapped_zec: account("zec.omft.testnet"),
        rpc_url: "https://rpc.testnet.near.org",
    },
    solana: SolanaDeployment {
        locker: pubkey!("Gy1XPwYZURfBzHiGAZUwQvWgc7JkxUdu2bZtToss971o"),
        wormhole_core: pubkey!("3u8hJUVTA4jH1wYAyUur7FFZVQ8H635K3tSHHF4ssjQ5"),
        post_message_shim: pubkey!("EtZMZM22ViKMo4r5y4Anovs3wKQ2owUmDpjygnMMcdEX"),
        rpc_url: "https://api.devnet.solana.com",
    },
    btc: UtxoDeployment {
        esplora_url: "https://blockstream.info/testnet/api",
        rpc_url: "https://bitcoin-testnet-rpc.publicnode.com",
    },
    zcash: UtxoDeployment {
        esplora_url: "https://testnet.zcashblockexplorer.com/api",
        rpc_url: "https://zec-testnet.nownodes.io",
    },
    api_url: "https://testnet.api.bridge.nearone.org",
    wormhole_api_url: "https://api.testnet.wormholescan.io",
});
