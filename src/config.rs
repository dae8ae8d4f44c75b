//! Construction-time configuration.
//!
//! Every component takes its configuration explicitly at construction; the
//! SDK holds no process-wide state. A [`BridgeConfig`] is the static
//! deployment table for the chosen network plus any caller-supplied RPC
//! overrides.

use std::collections::HashMap;
use url::Url;

use omni_bridge_types::chain::ChainKind;

use crate::networks::{BridgeNetwork, NetworkConfig};

/// SDK configuration: a network selection plus optional endpoint overrides.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    network: BridgeNetwork,
    near_rpc: Option<Url>,
    solana_rpc: Option<Url>,
    evm_rpc: HashMap<ChainKind, Url>,
    btc_api: Option<Url>,
    zcash_api: Option<Url>,
    api: Option<Url>,
    wormhole_api: Option<Url>,
}

impl BridgeConfig {
    pub fn new(network: BridgeNetwork) -> Self {
        Self {
            network,
            near_rpc: None,
            solana_rpc: None,
            evm_rpc: HashMap::new(),
            btc_api: None,
            zcash_api: None,
            api: None,
            wormhole_api: None,
        }
    }

    /// The static deployment table for the configured network.
    pub fn deployments(&self) -> &'static NetworkConfig {
        NetworkConfig::of(self.network)
    }

    pub fn network(&self) -> BridgeNetwork {
        self.network
    }

    pub fn with_near_rpc(mut self, url: Url) -> Self {
        self.near_rpc = Some(url);
        self
    }

    pub fn with_solana_rpc(mut self, url: Url) -> Self {
        self.solana_rpc = Some(url);
        self
    }

    pub fn with_evm_rpc(mut self, chain: ChainKind, url: Url) -> Self {
        self.evm_rpc.insert(chain, url);
        self
    }

    pub fn with_btc_api(mut self, url: Url) -> Self {
        self.btc_api = Some(url);
        self
    }

    pub fn with_zcash_api(mut self, url: Url) -> Self {
        self.zcash_api = Some(url);
        self
    }

    pub fn with_bridge_api(mut self, url: Url) -> Self {
        self.api = Some(url);
        self
    }

    pub fn with_wormhole_api(mut self, url: Url) -> Self {
        self.wormhole_api = Some(url);
        self
    }

    pub fn near_rpc(&self) -> Url {
        self.url_or_default(&self.near_rpc, self.deployments().near.rpc_url)
    }

    pub fn solana_rpc(&self) -> Url {
        self.url_or_default(&self.solana_rpc, self.deployments().solana.rpc_url)
    }

    pub fn evm_rpc(&self, chain: ChainKind) -> Option<Url> {
        self.evm_rpc.get(&chain).cloned()
    }

    pub fn btc_api(&self) -> Url {
        self.url_or_default(&self.btc_api, self.deployments().btc.esplora_url)
    }

    pub fn zcash_api(&self) -> Url {
        self.url_or_default(&self.zcash_api, self.deployments().zcash.esplora_url)
    }

    pub fn bridge_api(&self) -> Url {
        self.url_or_default(&self.api, self.deployments().api_url)
    }

    pub fn wormhole_api(&self) -> Url {
        self.url_or_default(&self.wormhole_api, self.deployments().wormhole_api_url)
    }

    fn url_or_default(&self, override_url: &Option<Url>, default: &'static str) -> Url {
        override_url
            .clone()
            .unwrap_or_else(|| Url::parse(default).expect("static default URLs are valid"))
    }
}
