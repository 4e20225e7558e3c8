//! Wallet/contract session lifecycle.
//!
//! The session is an explicit state machine,
//! `Unconnected → ProviderDetected → AccountAuthorized → ContractBound`,
//! and no transition skips its predecessor. `ContractBound` is terminal for
//! the session: there is no disconnect, the lifetime is the process's.
use ethers_core::types::Address;

use crate::{EngineError, ResultEngine};

/// Discrete phase of the session, for gating and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Unconnected,
    ProviderDetected,
    AccountAuthorized,
    ContractBound,
}

impl Phase {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unconnected => "unconnected",
            Self::ProviderDetected => "provider detected",
            Self::AccountAuthorized => "account authorized",
            Self::ContractBound => "contract bound",
        }
    }
}

/// Wallet/contract session state, one per process.
///
/// Operations that need the bound contract (balance fetch, deposit,
/// withdraw) must go through [`Session::account`] and [`Session::contract`]:
/// before `ContractBound` those return `None` and the caller rejects the
/// action instead of issuing a call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unconnected,
    ProviderDetected,
    AccountAuthorized {
        account: Address,
    },
    ContractBound {
        account: Address,
        contract: Address,
    },
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Unconnected => Phase::Unconnected,
            Self::ProviderDetected => Phase::ProviderDetected,
            Self::AccountAuthorized { .. } => Phase::AccountAuthorized,
            Self::ContractBound { .. } => Phase::ContractBound,
        }
    }

    #[must_use]
    pub fn provider_present(&self) -> bool {
        !matches!(self, Self::Unconnected)
    }

    #[must_use]
    pub fn account(&self) -> Option<Address> {
        match *self {
            Self::AccountAuthorized { account } | Self::ContractBound { account, .. } => {
                Some(account)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn contract(&self) -> Option<Address> {
        match *self {
            Self::ContractBound { contract, .. } => Some(contract),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::ContractBound { .. })
    }

    /// Marks the wallet provider as detected.
    ///
    /// Detection is monotonic: calling this after the session advanced is a
    /// no-op.
    pub fn detect_provider(&mut self) {
        if matches!(self, Self::Unconnected) {
            *self = Self::ProviderDetected;
        }
    }

    /// Records the account the wallet authorized.
    ///
    /// Requires a detected provider; re-authorizing before binding replaces
    /// the account.
    pub fn authorize(&mut self, account: Address) -> ResultEngine<()> {
        match self {
            Self::Unconnected => Err(EngineError::NoProvider),
            Self::ProviderDetected | Self::AccountAuthorized { .. } => {
                *self = Self::AccountAuthorized { account };
                Ok(())
            }
            Self::ContractBound { .. } => Err(EngineError::AlreadyBound),
        }
    }

    /// Binds the contract at `contract` to the authorized account.
    ///
    /// Calling this without an account is a precondition violation and is
    /// rejected.
    pub fn bind_contract(&mut self, contract: Address) -> ResultEngine<()> {
        match *self {
            Self::AccountAuthorized { account } => {
                *self = Self::ContractBound { account, contract };
                Ok(())
            }
            Self::ContractBound { .. } => Err(EngineError::AlreadyBound),
            _ => Err(EngineError::MissingAccount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        Address::from_low_u64_be(0xA11CE)
    }

    fn contract() -> Address {
        Address::from_low_u64_be(0xC0FFEE)
    }

    #[test]
    fn full_chain_reaches_contract_bound() {
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::Unconnected);

        session.detect_provider();
        assert_eq!(session.phase(), Phase::ProviderDetected);

        session.authorize(account()).unwrap();
        assert_eq!(session.account(), Some(account()));

        session.bind_contract(contract()).unwrap();
        assert!(session.is_bound());
        assert_eq!(session.contract(), Some(contract()));
    }

    #[test]
    fn authorize_without_provider_is_rejected() {
        let mut session = Session::new();
        assert_eq!(session.authorize(account()), Err(EngineError::NoProvider));
        assert_eq!(session.phase(), Phase::Unconnected);
    }

    #[test]
    fn bind_without_account_is_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.bind_contract(contract()),
            Err(EngineError::MissingAccount)
        );

        session.detect_provider();
        assert_eq!(
            session.bind_contract(contract()),
            Err(EngineError::MissingAccount)
        );
    }

    #[test]
    fn contract_bound_is_terminal() {
        let mut session = Session::new();
        session.detect_provider();
        session.authorize(account()).unwrap();
        session.bind_contract(contract()).unwrap();

        assert_eq!(
            session.bind_contract(contract()),
            Err(EngineError::AlreadyBound)
        );
        assert_eq!(session.authorize(account()), Err(EngineError::AlreadyBound));
    }

    #[test]
    fn contract_is_unavailable_before_binding() {
        let mut session = Session::new();
        assert_eq!(session.contract(), None);

        session.detect_provider();
        session.authorize(account()).unwrap();
        // Account known, contract still not bound: balance operations must
        // be rejected by callers.
        assert_eq!(session.contract(), None);
        assert!(!session.is_bound());
    }

    #[test]
    fn detect_is_monotonic() {
        let mut session = Session::new();
        session.detect_provider();
        session.authorize(account()).unwrap();
        session.detect_provider();
        assert_eq!(session.phase(), Phase::AccountAuthorized);
    }
}
