//! Instruction builders for the locker program.
//!
//! Anchor instruction data is the eight-byte discriminator
//! `sha256("global:<name>")[..8]` followed by the Borsh-serialized args.
//! Account ordering follows the program's IDL; optional accounts use the
//! Anchor convention of passing the program id as a read-only placeholder.
//!
//! Instructions that emit a cross-chain message carry the Wormhole account
//! set (bridge config, fee collector, sequence, the clock and rent sysvars,
//! the core program, and the post-message shim with its event authority) so
//! the program can post a VAA-signable message.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::{Pubkey, pubkey};

use omni_bridge_types::errors::ValidationError;
use omni_bridge_types::transfer::{TransferId, ValidatedTransfer};
use omni_bridge_types::Result;

use crate::mint::{fetch_mint, MintAccountSource};
use crate::pda;

pub const SYSTEM_PROGRAM: Pubkey = pubkey!("11111111111111111111111111111111");
pub const CLOCK_SYSVAR: Pubkey = pubkey!("SysvarC1ock11111111111111111111111111111111");
pub const RENT_SYSVAR: Pubkey = pubkey!("SysvarRent111111111111111111111111111111111");

/// Error substrings that mark a token redeployment racing an already-landed
/// deployment. Callers treat a matching contract failure as success with the
/// existing mint address.
pub const REDEPLOY_OK_ERRORS: [&str; 3] = [
    "AccountNotSystemOwned",
    "already in use",
    "invalid account data for instruction",
];

/// Whether an on-chain failure message marks an idempotent redeployment.
pub fn is_idempotent_redeploy(message: &str) -> bool {
    REDEPLOY_OK_ERRORS.iter().any(|needle| message.contains(needle))
}

/// `sha256("global:<name>")[..8]`, the Anchor method discriminator.
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

fn instruction_data<T: BorshSerialize>(name: &str, payload: &T) -> Vec<u8> {
    let mut data = anchor_discriminator(name).to_vec();
    data.extend(borsh::to_vec(payload).expect("payload structs serialize infallibly"));
    data
}

/// Args of `init_transfer` and `init_transfer_sol`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct InitTransferPayload {
    pub amount: u128,
    /// Recipient omni address on the destination chain.
    pub recipient: String,
    pub fee: u128,
    pub native_fee: u64,
    pub message: String,
}

/// Token metadata carried by `deploy_token`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TokenMetadataPayload {
    /// Omni address of the token on its home chain.
    pub token: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Args of `deploy_token`: MPC-signed metadata.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DeployTokenPayload {
    pub metadata: TokenMetadataPayload,
    pub signature: [u8; 65],
}

/// Args of `finalize_transfer`: MPC-signed transfer payload.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FinalizeTransferPayload {
    pub destination_nonce: u64,
    pub transfer_id: TransferId,
    pub amount: u128,
    pub fee_recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FinalizeTransferData {
    pub payload: FinalizeTransferPayload,
    pub signature: [u8; 65],
}

/// Builder for the locker program's instructions.
///
/// Stateless; all addresses are fixed at construction and every derivation
/// is deterministic.
#[derive(Debug, Clone)]
pub struct SolanaBridgeBuilder {
    program_id: Pubkey,
    wormhole_program: Pubkey,
    shim_program: Pubkey,
    shim_event_authority: Pubkey,
}

impl SolanaBridgeBuilder {
    pub fn new(
        program_id: Pubkey,
        wormhole_program: Pubkey,
        shim_program: Pubkey,
        shim_event_authority: Pubkey,
    ) -> Self {
        Self {
            program_id,
            wormhole_program,
            shim_program,
            shim_event_authority,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// The locker's authority PDA, mint authority of every bridged mint.
    pub fn authority(&self) -> Pubkey {
        pda::authority(&self.program_id).0
    }

    fn config(&self) -> Pubkey {
        pda::config(&self.program_id).0
    }

    /// The Wormhole account set appended to every message-emitting
    /// instruction.
    fn wormhole_accounts(&self) -> Vec<AccountMeta> {
        let config = self.config();
        let bridge = Pubkey::find_program_address(&[b"Bridge"], &self.wormhole_program).0;
        let fee_collector =
            Pubkey::find_program_address(&[b"fee_collector"], &self.wormhole_program).0;
        let sequence =
            Pubkey::find_program_address(&[b"Sequence", config.as_ref()], &self.wormhole_program).0;
        vec![
            AccountMeta::new(bridge, false),
            AccountMeta::new(fee_collector, false),
            AccountMeta::new(sequence, false),
            AccountMeta::new_readonly(CLOCK_SYSVAR, false),
            AccountMeta::new_readonly(RENT_SYSVAR, false),
            AccountMeta::new_readonly(self.wormhole_program, false),
            AccountMeta::new_readonly(self.shim_program, false),
            AccountMeta::new_readonly(self.shim_event_authority, false),
        ]
    }

    /// Anchor optional-account placeholder.
    fn none_account(&self) -> AccountMeta {
        AccountMeta::new_readonly(self.program_id, false)
    }

    /// `log_metadata`: emit a token's metadata as a Wormhole message so its
    /// bridged representations can be deployed on other chains.
    pub fn log_metadata(&self, payer: Pubkey, mint: Pubkey, token_program: Pubkey) -> Instruction {
        let mut accounts = vec![
            AccountMeta::new_readonly(self.config(), false),
            AccountMeta::new_readonly(self.authority(), false),
            AccountMeta::new_readonly(mint, false),
            AccountMeta::new(payer, true),
        ];
        accounts.extend(self.wormhole_accounts());
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
        accounts.push(AccountMeta::new_readonly(token_program, false));
        Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction_data("log_metadata", &()),
        }
    }

    /// `deploy_token`: create the wrapped mint for a foreign token from
    /// MPC-signed metadata.
    pub fn deploy_token(&self, payer: Pubkey, payload: &DeployTokenPayload) -> Instruction {
        let (mint, _) = pda::wrapped_mint(&self.program_id, &payload.metadata.token);
        let mut accounts = vec![
            AccountMeta::new(self.config(), false),
            AccountMeta::new_readonly(self.authority(), false),
            AccountMeta::new(mint, false),
            AccountMeta::new(payer, true),
        ];
        accounts.extend(self.wormhole_accounts());
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction_data("deploy_token", payload),
        }
    }

    /// The wrapped mint this builder's program derives for `token`.
    pub fn wrapped_mint(&self, token: &str) -> Pubkey {
        pda::wrapped_mint(&self.program_id, token).0
    }

    /// `init_transfer`: lock or burn SPL tokens for an outbound transfer.
    ///
    /// Bridged mints (mint authority is the locker's authority PDA) are
    /// burned and carry no vault; native mints are locked in the vault PDA.
    /// The token program is picked from the mint's account owner.
    pub async fn init_transfer<S: MintAccountSource + Sync>(
        &self,
        payer: Pubkey,
        transfer: &ValidatedTransfer,
        source: &S,
    ) -> Result<Vec<Instruction>> {
        let sol_token = transfer
            .params
            .token
            .clone();
        let mint = match &sol_token {
            omni_bridge_types::OmniAddress::Sol(address) => Pubkey::new_from_array(address.0),
            other => {
                return Err(ValidationError::InvalidAddress(format!(
                    "token {other} does not live on sol"
                ))
                .into());
            }
        };
        let mint_info = fetch_mint(&mint, source).await?;
        let bridged = mint_info.is_bridged(&self.authority());
        let from = pda::associated_token_account(&payer, &mint, &mint_info.token_program);
        let vault = if bridged {
            self.none_account()
        } else {
            AccountMeta::new(pda::vault(&self.program_id, &mint).0, false)
        };

        let payload = InitTransferPayload {
            amount: transfer.params.amount,
            recipient: transfer.params.recipient.to_string(),
            fee: transfer.params.fee,
            native_fee: u64::try_from(transfer.params.native_fee)
                .map_err(|_| ValidationError::InvalidAmount)?,
            message: transfer.params.message.clone().unwrap_or_default(),
        };

        tracing::debug!(%mint, bridged, "Building init_transfer");

        let mut accounts = vec![
            AccountMeta::new(self.config(), false),
            AccountMeta::new_readonly(self.authority(), false),
            AccountMeta::new(mint, false),
            AccountMeta::new(from, false),
            vault,
            AccountMeta::new(pda::sol_vault(&self.program_id).0, false),
            AccountMeta::new(payer, true),
        ];
        accounts.extend(self.wormhole_accounts());
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
        accounts.push(AccountMeta::new_readonly(mint_info.token_program, false));

        Ok(vec![Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction_data("init_transfer", &payload),
        }])
    }

    /// `init_transfer_sol`: lock SOL for an outbound transfer. `amount` is
    /// in lamports.
    pub fn init_transfer_sol(&self, payer: Pubkey, payload: &InitTransferPayload) -> Instruction {
        let mut accounts = vec![
            AccountMeta::new(self.config(), false),
            AccountMeta::new(pda::sol_vault(&self.program_id).0, false),
            AccountMeta::new(payer, true),
        ];
        accounts.extend(self.wormhole_accounts());
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
        Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction_data("init_transfer_sol", payload),
        }
    }

    /// `finalize_transfer`: mint or unlock tokens for an inbound transfer
    /// authorized by an MPC signature. The recipient's associated token
    /// account is created by the program if missing.
    pub async fn finalize_transfer<S: MintAccountSource + Sync>(
        &self,
        payer: Pubkey,
        recipient: Pubkey,
        mint: Pubkey,
        data: &FinalizeTransferData,
        source: &S,
    ) -> Result<Vec<Instruction>> {
        let mint_info = fetch_mint(&mint, source).await?;
        let bridged = mint_info.is_bridged(&self.authority());
        let recipient_ata = pda::associated_token_account(&recipient, &mint, &mint_info.token_program);
        let vault = if bridged {
            self.none_account()
        } else {
            AccountMeta::new(pda::vault(&self.program_id, &mint).0, false)
        };

        let mut accounts = vec![
            AccountMeta::new(self.config(), false),
            AccountMeta::new_readonly(self.authority(), false),
            AccountMeta::new(mint, false),
            AccountMeta::new(recipient_ata, false),
            AccountMeta::new_readonly(recipient, false),
            vault,
            AccountMeta::new(payer, true),
        ];
        accounts.extend(self.wormhole_accounts());
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM, false));
        accounts.push(AccountMeta::new_readonly(mint_info.token_program, false));
        accounts.push(AccountMeta::new_readonly(spl_associated_token_account::id(), false));

        Ok(vec![Instruction {
            program_id: self.program_id,
            accounts,
            data: instruction_data("finalize_transfer", data),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::AccountData;
    use async_trait::async_trait;
    use omni_bridge_types::chain::ChainKind;
    use omni_bridge_types::transfer::{TransferOptions, TransferParams};
    use spl_token::solana_program::program_option::COption;
    use spl_token::solana_program::program_pack::Pack;
    use std::str::FromStr;

    fn builder() -> SolanaBridgeBuilder {
        SolanaBridgeBuilder::new(
            Pubkey::from_str("dahPEoZGXfyV58JqqH85okdHmpN8U2q8owgPUXSCPxe").unwrap(),
            Pubkey::from_str("worm2ZoG2kUd4vFXhvjh93UUH596ayRfgQ2MgjNMTth").unwrap(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        )
    }

    struct FakeAccounts {
        owner: Pubkey,
        authority: Pubkey,
    }

    #[async_trait]
    impl MintAccountSource for FakeAccounts {
        async fn get_account(&self, _pubkey: &Pubkey) -> omni_bridge_types::Result<Option<AccountData>> {
            let state = spl_token::state::Mint {
                mint_authority: COption::Some(self.authority),
                supply: 1,
                decimals: 9,
                is_initialized: true,
                freeze_authority: COption::None,
            };
            let mut data = vec![0u8; spl_token::state::Mint::LEN];
            state.pack_into_slice(&mut data);
            Ok(Some(AccountData {
                owner: self.owner,
                data,
            }))
        }
    }

    fn sol_transfer(token: &str) -> ValidatedTransfer {
        let params = TransferParams {
            token: token.parse().unwrap(),
            amount: 1_000_000,
            fee: 100,
            native_fee: 0,
            sender: token.parse().unwrap(),
            recipient: "near:alice.near".parse().unwrap(),
            message: None,
            options: TransferOptions::default(),
        };
        ValidatedTransfer {
            source_chain: ChainKind::Sol,
            dest_chain: ChainKind::Near,
            normalized_amount: 1_000_000,
            normalized_fee: 100,
            contract_address: "dahPEoZGXfyV58JqqH85okdHmpN8U2q8owgPUXSCPxe".to_string(),
            bridged_token: "near:token.bridge.near".parse().unwrap(),
            params,
        }
    }

    #[test]
    fn discriminators_differ_by_method() {
        assert_ne!(
            anchor_discriminator("init_transfer"),
            anchor_discriminator("init_transfer_sol")
        );
        assert_eq!(
            anchor_discriminator("init_transfer"),
            anchor_discriminator("init_transfer")
        );
    }

    #[tokio::test]
    async fn native_mint_gets_a_vault() {
        let builder = builder();
        let source = FakeAccounts {
            owner: spl_token::id(),
            authority: Pubkey::new_unique(),
        };
        let transfer = sol_transfer("sol:EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        let instructions = builder
            .init_transfer(Pubkey::new_unique(), &transfer, &source)
            .await
            .unwrap();
        let vault_meta = &instructions[0].accounts[4];
        assert!(vault_meta.is_writable);
        assert_ne!(vault_meta.pubkey, *builder.program_id());
    }

    #[tokio::test]
    async fn bridged_mint_burns_without_vault() {
        let builder = builder();
        let source = FakeAccounts {
            owner: spl_token::id(),
            authority: builder.authority(),
        };
        let transfer = sol_transfer("sol:EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        let instructions = builder
            .init_transfer(Pubkey::new_unique(), &transfer, &source)
            .await
            .unwrap();
        // Optional vault collapses to the program-id placeholder.
        let vault_meta = &instructions[0].accounts[4];
        assert_eq!(vault_meta.pubkey, *builder.program_id());
        assert!(!vault_meta.is_writable);
    }

    #[tokio::test]
    async fn token_2022_mint_selects_token_2022_program() {
        let builder = builder();
        let source = FakeAccounts {
            owner: spl_token_2022::id(),
            authority: Pubkey::new_unique(),
        };
        let transfer = sol_transfer("sol:EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        let instructions = builder
            .init_transfer(Pubkey::new_unique(), &transfer, &source)
            .await
            .unwrap();
        let token_program = instructions[0].accounts.last().unwrap();
        assert_eq!(token_program.pubkey, spl_token_2022::id());
    }

    #[tokio::test]
    async fn wormhole_set_rides_every_emitting_instruction() {
        let builder = builder();
        let instruction = builder.init_transfer_sol(
            Pubkey::new_unique(),
            &InitTransferPayload {
                amount: 10,
                recipient: "near:alice.near".to_string(),
                fee: 0,
                native_fee: 0,
                message: String::new(),
            },
        );
        let keys: Vec<Pubkey> = instruction.accounts.iter().map(|m| m.pubkey).collect();
        assert!(keys.contains(&CLOCK_SYSVAR));
        assert!(keys.contains(&RENT_SYSVAR));
        assert!(keys.contains(&builder.wormhole_program));
        assert!(keys.contains(&builder.shim_program));
        assert!(keys.contains(&builder.shim_event_authority));
    }

    #[test]
    fn instruction_data_is_discriminator_then_borsh() {
        let payload = InitTransferPayload {
            amount: 1,
            recipient: "near:alice.near".to_string(),
            fee: 0,
            native_fee: 0,
            message: String::new(),
        };
        let data = instruction_data("init_transfer", &payload);
        assert_eq!(&data[..8], &anchor_discriminator("init_transfer"));
        let decoded = InitTransferPayload::try_from_slice(&data[8..]).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn redeploy_error_matching() {
        assert!(is_idempotent_redeploy(
            "Error processing Instruction 0: AccountNotSystemOwned"
        ));
        assert!(is_idempotent_redeploy("Allocate: account ... already in use"));
        assert!(!is_idempotent_redeploy("insufficient funds"));
    }

    #[test]
    fn wrong_chain_token_rejected() {
        let builder = builder();
        let transfer = sol_transfer("sol:EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        let mut bad = transfer;
        bad.params.token = "near:wrap.near".parse().unwrap();
        let source = FakeAccounts {
            owner: spl_token::id(),
            authority: Pubkey::new_unique(),
        };
        let result = futures_block_on(builder.init_transfer(Pubkey::new_unique(), &bad, &source));
        assert!(result.is_err());
    }

    fn futures_block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }
}
