//! Staking contract events
//!
//! ABI bindings for the four indexed events and their mapping onto
//! [`NewTransaction`] records.

use alloy::primitives::B256;
use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;

use crate::domain::entities::{NewTransaction, TransactionKind};
use crate::error::{IndexerError, IndexerResult};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    event Staked(
        uint256 indexed stakeId,
        address indexed user,
        address indexed token,
        uint256 amount,
        uint256 duration
    );

    #[derive(Debug, PartialEq, Eq)]
    event Unstaked(
        uint256 indexed stakeId,
        address indexed user,
        address indexed token,
        uint256 amount,
        bool early
    );

    #[derive(Debug, PartialEq, Eq)]
    event ClaimedRewards(
        uint256 indexed stakeId,
        address indexed user,
        address indexed token,
        uint256 amount
    );

    #[derive(Debug, PartialEq, Eq)]
    event TokensTransferredCrossChain(
        bytes32 indexed messageId,
        uint64 indexed destinationChainSelector,
        address receiver,
        address token,
        uint256 amount,
        address nativeToken,
        uint256 nativeFee
    );
}

/// topic0 of every indexed event, used for the subscription filter
pub fn event_signatures() -> Vec<B256> {
    vec![
        Staked::SIGNATURE_HASH,
        Unstaked::SIGNATURE_HASH,
        ClaimedRewards::SIGNATURE_HASH,
        TokensTransferredCrossChain::SIGNATURE_HASH,
    ]
}

/// Decoded event body
#[derive(Debug, PartialEq, Eq)]
pub enum EventData {
    Staked(Staked),
    Unstaked(Unstaked),
    ClaimedRewards(ClaimedRewards),
    Bridged(TokensTransferredCrossChain),
}

/// A recognised staking event together with the log metadata it was mined in
#[derive(Debug, PartialEq, Eq)]
pub struct StakingEvent {
    pub data: EventData,
    pub tx_hash: B256,
    pub block_number: i64,
}

impl StakingEvent {
    /// Decode a log by matching its topic0 against the indexed signatures.
    pub fn decode(log: &Log) -> IndexerResult<Self> {
        let topic0 = log.topic0().copied().unwrap_or_default();

        let data = if topic0 == Staked::SIGNATURE_HASH {
            EventData::Staked(Staked::decode_log_data(log.data())?)
        } else if topic0 == Unstaked::SIGNATURE_HASH {
            EventData::Unstaked(Unstaked::decode_log_data(log.data())?)
        } else if topic0 == ClaimedRewards::SIGNATURE_HASH {
            EventData::ClaimedRewards(ClaimedRewards::decode_log_data(log.data())?)
        } else if topic0 == TokensTransferredCrossChain::SIGNATURE_HASH {
            EventData::Bridged(TokensTransferredCrossChain::decode_log_data(log.data())?)
        } else {
            return Err(IndexerError::UnknownEvent(topic0));
        };

        let tx_hash = log
            .transaction_hash
            .ok_or(IndexerError::MissingLogField("transaction_hash"))?;
        let block_number = log
            .block_number
            .ok_or(IndexerError::MissingLogField("block_number"))?;
        let block_number = i64::try_from(block_number).map_err(|_| {
            IndexerError::Internal(format!("block number {block_number} out of range"))
        })?;

        Ok(Self {
            data,
            tx_hash,
            block_number,
        })
    }

    pub fn kind(&self) -> TransactionKind {
        match self.data {
            EventData::Staked(_) => TransactionKind::Stake,
            EventData::Unstaked(_) => TransactionKind::Unstake,
            EventData::ClaimedRewards(_) => TransactionKind::ClaimRewards,
            EventData::Bridged(_) => TransactionKind::Bridge,
        }
    }

    /// Map onto the row shape stored in `transactions`
    pub fn into_record(self) -> NewTransaction {
        let kind = self.kind();
        let tx_hash = to_hex(self.tx_hash);

        match self.data {
            EventData::Staked(e) => NewTransaction {
                stake_id: Some(e.stakeId.to_string()),
                duration: Some(e.duration.to_string()),
                ..NewTransaction::base(
                    kind,
                    to_hex(e.user),
                    to_hex(e.token),
                    e.amount.to_string(),
                    tx_hash,
                    self.block_number,
                )
            },
            EventData::Unstaked(e) => NewTransaction {
                stake_id: Some(e.stakeId.to_string()),
                early: Some(e.early),
                ..NewTransaction::base(
                    kind,
                    to_hex(e.user),
                    to_hex(e.token),
                    e.amount.to_string(),
                    tx_hash,
                    self.block_number,
                )
            },
            EventData::ClaimedRewards(e) => NewTransaction {
                stake_id: Some(e.stakeId.to_string()),
                ..NewTransaction::base(
                    kind,
                    to_hex(e.user),
                    to_hex(e.token),
                    e.amount.to_string(),
                    tx_hash,
                    self.block_number,
                )
            },
            EventData::Bridged(e) => NewTransaction {
                message_id: Some(to_hex(e.messageId)),
                destination_chain_selector: Some(e.destinationChainSelector.to_string()),
                native_token: Some(to_hex(e.nativeToken)),
                native_fee: Some(e.nativeFee.to_string()),
                ..NewTransaction::base(
                    kind,
                    to_hex(e.receiver),
                    to_hex(e.token),
                    e.amount.to_string(),
                    tx_hash,
                    self.block_number,
                )
            },
        }
    }
}

/// Lowercase `0x` hex
fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", alloy::hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, LogData, U256, address, b256};

    const USER: Address = address!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    const TOKEN: Address = address!("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");

    fn log_with(data: LogData, tx_hash: Option<B256>, block_number: Option<u64>) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::repeat_byte(0x42),
                data,
            },
            block_number,
            transaction_hash: tx_hash,
            ..Default::default()
        }
    }

    #[test]
    fn staked_maps_to_stake_record() {
        let data = Staked {
            stakeId: U256::from(7),
            user: USER,
            token: TOKEN,
            amount: U256::from(1_000_000_000_000_000_000u128),
            duration: U256::from(86_400),
        }
        .encode_log_data();
        let hash = B256::repeat_byte(0xab);

        let event = StakingEvent::decode(&log_with(data, Some(hash), Some(12))).unwrap();
        let record = event.into_record();

        assert_eq!(record.tx_type, TransactionKind::Stake);
        assert_eq!(record.user_address, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert_eq!(record.token_address, "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359");
        assert_eq!(record.amount, "1000000000000000000");
        assert_eq!(record.stake_id.as_deref(), Some("7"));
        assert_eq!(record.duration.as_deref(), Some("86400"));
        assert_eq!(record.early, None);
        assert_eq!(record.tx_hash, format!("0x{}", "ab".repeat(32)));
        assert_eq!(record.block_number, 12);
    }

    #[test]
    fn unstaked_keeps_early_flag() {
        let data = Unstaked {
            stakeId: U256::from(3),
            user: USER,
            token: TOKEN,
            amount: U256::from(5),
            early: true,
        }
        .encode_log_data();

        let record = StakingEvent::decode(&log_with(data, Some(B256::ZERO), Some(1)))
            .unwrap()
            .into_record();

        assert_eq!(record.tx_type, TransactionKind::Unstake);
        assert_eq!(record.early, Some(true));
        assert_eq!(record.duration, None);
    }

    #[test]
    fn claimed_rewards_has_stake_id_only() {
        let data = ClaimedRewards {
            stakeId: U256::from(9),
            user: USER,
            token: TOKEN,
            amount: U256::from(42),
        }
        .encode_log_data();

        let record = StakingEvent::decode(&log_with(data, Some(B256::ZERO), Some(1)))
            .unwrap()
            .into_record();

        assert_eq!(record.tx_type, TransactionKind::ClaimRewards);
        assert_eq!(record.stake_id.as_deref(), Some("9"));
        assert_eq!(record.amount, "42");
        assert_eq!(record.early, None);
    }

    #[test]
    fn bridge_uses_receiver_as_user() {
        let message_id =
            b256!("0x00000000000000000000000000000000000000000000000000000000000000ff");
        let data = TokensTransferredCrossChain {
            messageId: message_id,
            destinationChainSelector: 16_015_286_601_757_825_753,
            receiver: USER,
            token: TOKEN,
            amount: U256::MAX,
            nativeToken: Address::ZERO,
            nativeFee: U256::from(123),
        }
        .encode_log_data();

        let record = StakingEvent::decode(&log_with(data, Some(B256::ZERO), Some(1)))
            .unwrap()
            .into_record();

        assert_eq!(record.tx_type, TransactionKind::Bridge);
        assert_eq!(record.user_address, "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert_eq!(record.amount, U256::MAX.to_string());
        assert_eq!(
            record.message_id,
            Some(format!("0x{}", alloy::hex::encode(message_id)))
        );
        assert_eq!(
            record.destination_chain_selector.as_deref(),
            Some("16015286601757825753")
        );
        assert_eq!(
            record.native_token.as_deref(),
            Some("0x0000000000000000000000000000000000000000")
        );
        assert_eq!(record.native_fee.as_deref(), Some("123"));
        assert_eq!(record.stake_id, None);
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let topic = B256::repeat_byte(0x11);
        let data = LogData::new_unchecked(vec![topic], Default::default());

        let err = StakingEvent::decode(&log_with(data, Some(B256::ZERO), Some(1))).unwrap_err();
        assert!(matches!(err, IndexerError::UnknownEvent(t) if t == topic));
    }

    #[test]
    fn pending_log_is_missing_fields() {
        let data = ClaimedRewards {
            stakeId: U256::from(1),
            user: USER,
            token: TOKEN,
            amount: U256::from(1),
        }
        .encode_log_data();

        let err = StakingEvent::decode(&log_with(data.clone(), None, Some(1))).unwrap_err();
        assert!(matches!(err, IndexerError::MissingLogField("transaction_hash")));

        let err = StakingEvent::decode(&log_with(data, Some(B256::ZERO), None)).unwrap_err();
        assert!(matches!(err, IndexerError::MissingLogField("block_number")));
    }

    #[test]
    fn signature_list_covers_all_events() {
        let signatures = event_signatures();
        assert_eq!(signatures.len(), 4);
        assert!(signatures.contains(&TokensTransferredCrossChain::SIGNATURE_HASH));
    }
}
