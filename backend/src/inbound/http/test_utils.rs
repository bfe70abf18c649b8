//! Test helpers for inbound HTTP components.

use actix_web::web;
use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::ports::{
    AccessGate, MockAccountCommand, MockInventoryCommand, MockInventoryQuery,
};
use crate::domain::{AccessError, Identity};

use super::state::{HttpState, HttpStatePorts};

/// Access gate returning a fixed outcome regardless of the header.
#[derive(Debug, Clone)]
pub enum StubGate {
    Allow(Identity),
    Deny(AccessError),
}

#[async_trait]
impl AccessGate for StubGate {
    async fn authenticate(&self, _authorization: Option<&str>) -> Result<Identity, AccessError> {
        match self {
            Self::Allow(identity) => Ok(identity.clone()),
            Self::Deny(error) => Err(error.clone()),
        }
    }
}

/// Mocked driving ports; unconfigured mocks panic when called.
pub struct TestPorts {
    pub gate: StubGate,
    pub accounts: MockAccountCommand,
    pub inventory: MockInventoryCommand,
    pub catalogue: MockInventoryQuery,
}

impl TestPorts {
    pub fn new(gate: StubGate) -> Self {
        Self {
            gate,
            accounts: MockAccountCommand::new(),
            inventory: MockInventoryCommand::new(),
            catalogue: MockInventoryQuery::new(),
        }
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            access: Arc::new(self.gate),
            accounts: Arc::new(self.accounts),
            inventory: Arc::new(self.inventory),
            catalogue: Arc::new(self.catalogue),
        }))
    }
}

/// State whose only working port is `gate`.
pub fn state_with_gate(gate: StubGate) -> web::Data<HttpState> {
    TestPorts::new(gate).into_state()
}
