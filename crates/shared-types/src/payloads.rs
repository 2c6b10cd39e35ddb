//! # Signable Payloads
//!
//! The closed set of message variants a validator may be asked to attest.
//!
//! Every variant implements [`SignablePayload`], the fixed capability surface
//! the relay relies on (a type tag, an identifier, and access to the raw
//! message body). Binary fields are carried as base64 strings so that the
//! canonical encoder only ever sees textual data.

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

/// Capability surface shared by every signable payload.
pub trait SignablePayload {
    /// Type tag of the concrete variant.
    fn type_url(&self) -> &'static str;

    /// Identifier of the payload within its destination chain.
    fn message_id(&self) -> String;

    /// The raw message body the payload wraps.
    fn raw_message(&self) -> &[u8];
}

/// A payload type a fetch may ask for.
///
/// Implemented by every concrete variant and by [`Signable`] itself; the
/// latter accepts any registered variant.
pub trait ExpectedPayload: SignablePayload + Serialize + Send + Sync + Sized + 'static {
    /// Descriptor of what this type accepts, used in mismatch reports.
    fn expected_type() -> &'static str;

    /// Narrow a decoded value to `Self`, handing it back unchanged on mismatch.
    fn from_signable(value: Signable) -> Result<Self, Signable>;
}

/// Replace the validator set on a target chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateValset {
    pub chain_reference_id: String,
    pub valset_id: u64,
    pub validators: Vec<String>,
    pub powers: Vec<u64>,
    /// Checkpoint hash of the new set, as computed by the target contract.
    #[serde_as(as = "Base64")]
    pub checkpoint: Vec<u8>,
}

/// Execute a logic call against a contract on a target chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitLogicCall {
    pub chain_reference_id: String,
    pub contract_address: String,
    #[serde_as(as = "Base64")]
    pub payload: Vec<u8>,
    pub deadline: i64,
}

/// Deploy a contract on a target chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSmartContract {
    pub chain_reference_id: String,
    pub abi: String,
    #[serde_as(as = "Base64")]
    pub bytecode: Vec<u8>,
    #[serde_as(as = "Base64")]
    pub constructor_input: Vec<u8>,
}

/// Attest the balances of validator addresses on a target chain.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorBalancesAttestation {
    pub chain_reference_id: String,
    pub from_block_time: u64,
    pub hex_addresses: Vec<String>,
    #[serde_as(as = "Base64")]
    pub request_hash: Vec<u8>,
}

impl UpdateValset {
    pub const TYPE_URL: &'static str = "/relay.UpdateValset";
}

impl SubmitLogicCall {
    pub const TYPE_URL: &'static str = "/relay.SubmitLogicCall";
}

impl UploadSmartContract {
    pub const TYPE_URL: &'static str = "/relay.UploadSmartContract";
}

impl ValidatorBalancesAttestation {
    pub const TYPE_URL: &'static str = "/relay.ValidatorBalancesAttestation";
}

impl SignablePayload for UpdateValset {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn message_id(&self) -> String {
        format!("{}/valset/{}", self.chain_reference_id, self.valset_id)
    }

    fn raw_message(&self) -> &[u8] {
        &self.checkpoint
    }
}

impl SignablePayload for SubmitLogicCall {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn message_id(&self) -> String {
        format!("{}/call/{}", self.chain_reference_id, self.contract_address)
    }

    fn raw_message(&self) -> &[u8] {
        &self.payload
    }
}

impl SignablePayload for UploadSmartContract {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn message_id(&self) -> String {
        format!("{}/upload", self.chain_reference_id)
    }

    fn raw_message(&self) -> &[u8] {
        &self.bytecode
    }
}

impl SignablePayload for ValidatorBalancesAttestation {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn message_id(&self) -> String {
        format!("{}/balances/{}", self.chain_reference_id, self.from_block_time)
    }

    fn raw_message(&self) -> &[u8] {
        &self.request_hash
    }
}

/// Any signable payload.
///
/// Serialises as the bare inner value so that the bytes a validator signs do
/// not depend on how the relay represents the union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Signable {
    UpdateValset(UpdateValset),
    SubmitLogicCall(SubmitLogicCall),
    UploadSmartContract(UploadSmartContract),
    ValidatorBalancesAttestation(ValidatorBalancesAttestation),
}

impl Signable {
    fn as_payload(&self) -> &dyn SignablePayload {
        match self {
            Self::UpdateValset(p) => p,
            Self::SubmitLogicCall(p) => p,
            Self::UploadSmartContract(p) => p,
            Self::ValidatorBalancesAttestation(p) => p,
        }
    }
}

impl SignablePayload for Signable {
    fn type_url(&self) -> &'static str {
        self.as_payload().type_url()
    }

    fn message_id(&self) -> String {
        self.as_payload().message_id()
    }

    fn raw_message(&self) -> &[u8] {
        self.as_payload().raw_message()
    }
}

impl ExpectedPayload for Signable {
    fn expected_type() -> &'static str {
        "any signable payload"
    }

    fn from_signable(value: Signable) -> Result<Self, Signable> {
        Ok(value)
    }
}

macro_rules! signable_variant {
    ($variant:ident) => {
        impl From<$variant> for Signable {
            fn from(value: $variant) -> Self {
                Self::$variant(value)
            }
        }

        impl ExpectedPayload for $variant {
            fn expected_type() -> &'static str {
                Self::TYPE_URL
            }

            fn from_signable(value: Signable) -> Result<Self, Signable> {
                match value {
                    Signable::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

signable_variant!(UpdateValset);
signable_variant!(SubmitLogicCall);
signable_variant!(UploadSmartContract);
signable_variant!(ValidatorBalancesAttestation);
