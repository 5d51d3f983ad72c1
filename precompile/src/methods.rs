//! Call surface of the staking precompile.
//!
//! The set of methods is closed: every selector the precompile answers to is
//! derived at startup from [`MethodId`] and registered once.

use alloy_dyn_abi::DynSolType;
use alloy_primitives::Selector;
use indexmap::IndexMap;
use itertools::Itertools;
use lazy_static::lazy_static;
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::abi::{self, array, selector};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum MethodId {
    // Queries
    Delegation,
    UnbondingDelegation,
    Validator,
    Validators,
    Redelegation,
    Redelegations,
    Allowance,
    // Staking transactions
    Delegate,
    Undelegate,
    Redelegate,
    CancelUnbondingDelegation,
    // Grant management
    Approve,
    Revoke,
    IncreaseAllowance,
    DecreaseAllowance,
}

impl MethodId {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            MethodId::Delegation
                | MethodId::UnbondingDelegation
                | MethodId::Validator
                | MethodId::Validators
                | MethodId::Redelegation
                | MethodId::Redelegations
                | MethodId::Allowance
        )
    }

    pub fn inputs(&self) -> Vec<DynSolType> {
        use DynSolType::*;

        match self {
            MethodId::Delegation | MethodId::UnbondingDelegation => vec![Address, Address],
            MethodId::Validator => vec![Address],
            MethodId::Validators => vec![String, page_request_type()],
            MethodId::Redelegation => vec![Address, Address, Address],
            MethodId::Redelegations => vec![Address, Address, Address, page_request_type()],
            MethodId::Allowance => vec![Address, Address, String],
            MethodId::Delegate | MethodId::Undelegate => vec![Address, Address, Uint(256)],
            MethodId::Redelegate => vec![Address, Address, Address, Uint(256)],
            MethodId::CancelUnbondingDelegation => {
                vec![Address, Address, Uint(256), Uint(256)]
            }
            MethodId::Approve | MethodId::IncreaseAllowance | MethodId::DecreaseAllowance => {
                vec![Address, Uint(256), array(String)]
            }
            MethodId::Revoke => vec![Address, array(String)],
        }
    }

    pub fn outputs(&self) -> Vec<DynSolType> {
        match self {
            MethodId::Delegation => vec![DynSolType::Uint(256), coin_type()],
            MethodId::UnbondingDelegation => vec![unbonding_delegation_type()],
            MethodId::Validator => vec![validator_type()],
            MethodId::Validators => {
                vec![array(validator_type()), page_response_type()]
            }
            MethodId::Redelegation => vec![redelegation_type()],
            MethodId::Redelegations => vec![
                array(redelegation_response_type()),
                page_response_type(),
            ],
            MethodId::Allowance => vec![DynSolType::Uint(256)],
            MethodId::Undelegate | MethodId::Redelegate => vec![DynSolType::Int(64)],
            MethodId::Delegate
            | MethodId::CancelUnbondingDelegation
            | MethodId::Approve
            | MethodId::Revoke
            | MethodId::IncreaseAllowance
            | MethodId::DecreaseAllowance => vec![DynSolType::Bool],
        }
    }

    /// Canonical signature, e.g. `delegate(address,address,uint256)`
    pub fn signature(&self) -> String {
        format!(
            "{}({})",
            self.name(),
            self.inputs().iter().map(DynSolType::sol_type_name).join(",")
        )
    }

    pub fn selector(&self) -> Selector {
        self.method().selector
    }

    pub fn method(&self) -> &'static Method {
        &METHODS[*self as usize]
    }
}

/// Registered method, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub id: MethodId,
    pub selector: Selector,
    pub inputs: Vec<DynSolType>,
    pub outputs: Vec<DynSolType>,
}

impl Method {
    fn new(id: MethodId) -> Self {
        Self {
            id,
            selector: selector(&id.signature()),
            inputs: id.inputs(),
            outputs: id.outputs(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn is_mutating(&self) -> bool {
        self.id.is_mutating()
    }

    /// Whether every argument sits in the head, one word each
    pub fn has_static_inputs(&self) -> bool {
        !self.inputs.iter().any(DynSolType::is_dynamic)
    }

    /// Bytes taken by the argument heads
    pub fn head_size(&self) -> usize {
        self.inputs.iter().map(abi::head_size).sum()
    }
}

lazy_static! {
    // Indexed by `MethodId as usize`
    static ref METHODS: Vec<Method> = MethodId::iter().map(Method::new).collect();
    static ref SELECTORS: IndexMap<Selector, MethodId> =
        METHODS.iter().map(|method| (method.selector, method.id)).collect();
}

/// Method registered under `selector`, if any
pub fn lookup(selector: &[u8]) -> Option<&'static Method> {
    let selector = Selector::try_from(selector).ok()?;
    SELECTORS.get(&selector).map(MethodId::method)
}

/// Every registered method, in declaration order
pub fn methods() -> impl Iterator<Item = &'static Method> {
    METHODS.iter()
}

// ===== Shared struct layouts =====

/// `(bytes key, uint64 offset, uint64 limit, bool countTotal, bool reverse)`
pub fn page_request_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Bytes,
        DynSolType::Uint(64),
        DynSolType::Uint(64),
        DynSolType::Bool,
        DynSolType::Bool,
    ])
}

/// `(bytes nextKey, uint64 total)`
pub fn page_response_type() -> DynSolType {
    DynSolType::Tuple(vec![DynSolType::Bytes, DynSolType::Uint(64)])
}

/// `(string denom, uint256 amount)`
pub fn coin_type() -> DynSolType {
    DynSolType::Tuple(vec![DynSolType::String, DynSolType::Uint(256)])
}

pub fn validator_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,    // operatorAddress
        DynSolType::String,     // consensusPubkey
        DynSolType::Bool,       // jailed
        DynSolType::Uint(8),    // status
        DynSolType::Uint(256),  // tokens
        DynSolType::Uint(256),  // delegatorShares
        DynSolType::String,     // description
        DynSolType::Int(64),    // unbondingHeight
        DynSolType::Int(64),    // unbondingTime
        DynSolType::Uint(256),  // commission
        DynSolType::Uint(256),  // minSelfDelegation
    ])
}

pub fn unbonding_entry_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Int(64),   // creationHeight
        DynSolType::Int(64),   // completionTime
        DynSolType::Uint(256), // initialBalance
        DynSolType::Uint(256), // balance
        DynSolType::Uint(64),  // unbondingId
        DynSolType::Int(64),   // unbondingOnHoldRefCount
    ])
}

pub fn unbonding_delegation_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Address,
        array(unbonding_entry_type()),
    ])
}

pub fn redelegation_entry_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Int(64),   // creationHeight
        DynSolType::Int(64),   // completionTime
        DynSolType::Uint(256), // initialBalance
        DynSolType::Uint(256), // sharesDst
    ])
}

pub fn redelegation_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Address,
        DynSolType::Address,
        array(redelegation_entry_type()),
    ])
}

/// `(redelegation, (entry, uint256 balance)[])`
pub fn redelegation_response_type() -> DynSolType {
    DynSolType::Tuple(vec![
        redelegation_type(),
        array(DynSolType::Tuple(vec![
            redelegation_entry_type(),
            DynSolType::Uint(256),
        ])),
    ])
}
