//! Request-facing helpers around a [`Registry`].
//!
//! A web framework or proxy implements [`ClientAddress`] for its request type
//! and uses a [`Guard`] to turn authorization results into decisions.

use std::net::{IpAddr, SocketAddr};
use tracing::{info, warn};

use crate::error::{Result, ShieldError};
use crate::registry::Registry;
use crate::validation::{Entry, RawEntry};

#[cfg(test)]
use mockall::automock;

/// Anything that can report the address of the client that sent it.
#[cfg_attr(test, automock)]
pub trait ClientAddress {
    /// The client address as a string, or `None` if the transport has none.
    fn client_addr(&self) -> Option<String>;
}

impl ClientAddress for str {
    fn client_addr(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ClientAddress for String {
    fn client_addr(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl ClientAddress for IpAddr {
    fn client_addr(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ClientAddress for SocketAddr {
    fn client_addr(&self) -> Option<String> {
        Some(self.ip().to_string())
    }
}

impl<T: ClientAddress> ClientAddress for Option<T> {
    fn client_addr(&self) -> Option<String> {
        self.as_ref().and_then(ClientAddress::client_addr)
    }
}

/// Outcome of [`Guard::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Authorization helpers bound to one registry.
#[derive(Debug, Clone, Copy)]
pub struct Guard<'a> {
    registry: &'a Registry,
}

impl<'a> Guard<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Startup hook: load the initial allow-list.
    ///
    /// An empty list is rejected, since it would deny every request.
    pub fn configure(&self, entries: &[RawEntry]) -> Result<Vec<Entry>> {
        if entries.is_empty() {
            return Err(ShieldError::NoAddresses);
        }
        self.registry.initialize(entries)
    }

    pub fn is_authorized<R: ClientAddress + ?Sized>(&self, request: &R) -> Result<bool> {
        let addr = client_addr(request)?;
        self.registry.authorize(&addr)
    }

    pub fn decide<R: ClientAddress + ?Sized>(&self, request: &R) -> Result<Decision> {
        if self.is_authorized(request)? {
            Ok(Decision::Allow)
        } else {
            Ok(Decision::Deny)
        }
    }

    /// Fail with [`ShieldError::Unauthorized`] unless the client is authorized.
    pub fn must_be_authorized<R: ClientAddress + ?Sized>(&self, request: &R) -> Result<()> {
        let addr = client_addr(request)?;
        if self.registry.authorize(&addr)? {
            Ok(())
        } else {
            warn!("Rejected unauthorized client {}", addr);
            Err(ShieldError::Unauthorized(addr))
        }
    }

    /// Grant access to the requesting client's own address.
    pub fn authorize_client<R: ClientAddress + ?Sized>(&self, request: &R) -> Result<Entry> {
        let addr = client_addr(request)?;
        let entry = self.registry.add(&RawEntry::Address(addr))?;
        info!("Client {} authorized itself", entry);
        Ok(entry)
    }

    /// Revoke the requesting client's own address.
    pub fn deauthorize_client<R: ClientAddress + ?Sized>(&self, request: &R) -> Result<Entry> {
        let addr = client_addr(request)?;
        self.registry.remove(&RawEntry::Address(addr))
    }
}

fn client_addr<R: ClientAddress + ?Sized>(request: &R) -> Result<String> {
    request.client_addr().ok_or(ShieldError::AddressMissing)
}
