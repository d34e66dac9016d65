use tracing::{debug, info, warn};

use crate::client::StacksNode;
use crate::encoding::ClarityValue;
use crate::error::Result;
use crate::key::StacksPrivateKey;
use crate::signing::sign_transaction;
use crate::transaction::{ContractCallPayload, SinglesigSpendingCondition, StacksTransaction};
use crate::types::{ContractCallRequest, MessageSignature, NetworkTarget, NoncePolicy, ReadOnlyCallRequest, Txid};

/// Build and sign a contract call for a known nonce. No I/O.
pub fn build_contract_call(
    req: &ContractCallRequest,
    nonce: u64,
    key: &StacksPrivateKey,
    network: &NetworkTarget,
) -> Result<StacksTransaction> {
    let sender = key.address(network.version.singlesig_address_version())?;
    let mut tx = StacksTransaction {
        version: network.version,
        chain_id: network.chain_id,
        auth: SinglesigSpendingCondition {
            signer: *sender.hash160(),
            nonce,
            tx_fee: req.fee,
            key_encoding: key.encoding(),
            signature: MessageSignature::empty(),
        },
        anchor_mode: req.anchor_mode,
        post_condition_mode: req.post_condition_mode,
        payload: ContractCallPayload {
            contract: req.contract.clone(),
            function_name: req.function_name.clone(),
            function_args: req.function_args.clone(),
        },
    };
    // encode once up front so a bad argument surfaces before signing
    tx.serialize()?;
    sign_transaction(&mut tx, key)?;
    Ok(tx)
}

/// An explicit nonce wins; otherwise the node is asked for the sender's next one.
pub async fn resolve_nonce(node: &dyn StacksNode, policy: NoncePolicy, key: &StacksPrivateKey) -> Result<u64> {
    match policy {
        NoncePolicy::Explicit(n) => Ok(n),
        NoncePolicy::FromNode => {
            let sender = key.address(node.network().version.singlesig_address_version())?;
            let nonce = node.account_nonce(&sender).await?;
            debug!(%sender, nonce, "nonce from node");
            Ok(nonce)
        }
    }
}

/// Resolve the nonce against `node` and produce a signed transaction for its network.
pub async fn make_contract_call(
    node: &dyn StacksNode,
    req: &ContractCallRequest,
    key: &StacksPrivateKey,
) -> Result<StacksTransaction> {
    let nonce = resolve_nonce(node, req.nonce, key).await?;
    let tx = build_contract_call(req, nonce, key, node.network())?;
    debug!(
        contract = %req.contract,
        function = %req.function_name,
        nonce,
        fee = req.fee,
        "built contract call"
    );
    Ok(tx)
}

pub async fn broadcast_transaction(node: &dyn StacksNode, tx: &StacksTransaction) -> Result<Txid> {
    let expected = tx.txid()?;
    let txid = node.broadcast(tx).await?;
    if txid != expected {
        warn!(%expected, %txid, "node reported a different txid");
    }
    info!(%txid, "transaction accepted");
    Ok(txid)
}

pub async fn call_read_only_function(node: &dyn StacksNode, call: &ReadOnlyCallRequest) -> Result<ClarityValue> {
    debug!(contract = %call.contract, function = %call.function_name, sender = %call.sender, "read-only call");
    node.call_read_only(call).await
}

/// What a script prints for a read-only result: the payload of a response, the value otherwise.
pub fn display_result(value: &ClarityValue) -> String {
    match value {
        ClarityValue::ResponseOk(inner) | ClarityValue::ResponseErr(inner) => inner.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{some_cv, standard_principal_cv, uint_cv, ClarityName};
    use crate::signing::verify_transaction;
    use crate::types::{AnchorMode, PostConditionMode};

    const KEY: &str = "753b7cc01a1a2e86221266a154af739463fce51219d97e4f856cd7200c3bd2a601";
    const USER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    #[test]
    fn display_unwraps_responses_only() {
        let owner = some_cv(standard_principal_cv(USER).unwrap());
        assert_eq!(display_result(&ClarityValue::ResponseOk(Box::new(owner.clone()))), format!("(some {USER})"));
        assert_eq!(display_result(&ClarityValue::ResponseErr(Box::new(uint_cv(101)))), "u101");
        assert_eq!(display_result(&owner), format!("(some {USER})"));
    }

    #[test]
    fn built_call_carries_network_parameters() {
        let req = ContractCallRequest {
            contract: format!("{USER}.subnet").parse().unwrap(),
            function_name: ClarityName::new("deposit-stx").unwrap(),
            function_args: vec![uint_cv(1), standard_principal_cv(USER).unwrap()],
            fee: 10_000,
            nonce: NoncePolicy::Explicit(9),
            anchor_mode: AnchorMode::Any,
            post_condition_mode: PostConditionMode::Allow,
        };
        let key = StacksPrivateKey::from_hex(KEY).unwrap();
        let network = NetworkTarget::testnet("http://localhost:30443", 0x1234_5678);

        let tx = build_contract_call(&req, 9, &key, &network).unwrap();

        assert_eq!(tx.chain_id, 0x1234_5678);
        assert_eq!(tx.auth.nonce, 9);
        assert_eq!(tx.sender().unwrap().to_string(), USER);
        assert!(verify_transaction(&tx).unwrap());
    }
}
