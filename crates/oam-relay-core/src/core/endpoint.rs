// oam-relay-core/src/core/endpoint.rs
// ============================================================================
// Module: OaM Relay Endpoint Model
// Description: Desired and resolved state of peer application connections.
// Purpose: Describe identity, transport, and operation endpoints with typed fields.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! An [`EndpointDescription`] is the request-scoped desired state of a peer
//! application connection. It is diffed against the stored resources, never
//! persisted as-is. [`ApplicationEndpoints`] holds the resolved identifiers of
//! the physical resources representing one application.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ApplicationName;
use crate::core::identifiers::EndpointId;
use crate::core::identifiers::OperationName;
use crate::core::identifiers::OperationPath;
use crate::core::identifiers::ReleaseNumber;

// ============================================================================
// SECTION: Transport Fields
// ============================================================================

/// Remote protocol of a peer application's transport endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteProtocol {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl fmt::Display for RemoteProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

/// Remote address of a peer application's transport endpoint.
///
/// The address is typed so equality is structural: two representations of the
/// same IP address compare equal, and an IP address never compares equal to a
/// domain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteAddress {
    /// Literal IP address.
    IpAddress(IpAddr),
    /// DNS domain name.
    DomainName(String),
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IpAddress(ip) => ip.fmt(f),
            Self::DomainName(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// SECTION: Endpoint Description
// ============================================================================

/// Desired state of a peer application connection.
///
/// Supplied per lifecycle request and diffed field-by-field against the
/// stored resources; a description is never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointDescription {
    /// Application name.
    pub application_name: ApplicationName,
    /// Release number.
    pub release_number: ReleaseNumber,
    /// Remote protocol.
    pub remote_protocol: RemoteProtocol,
    /// Remote address.
    pub remote_address: RemoteAddress,
    /// Remote port.
    pub remote_port: u16,
    /// Named operations mapped to their routing paths.
    pub operations: BTreeMap<OperationName, OperationPath>,
}

/// Desired connection state of the successor release in a handover.
///
/// A successor carries no operations map; only identity and transport fields
/// are reconciled during `bequeath-your-data-and-die`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuccessorDescription {
    /// Application name of the successor.
    pub application_name: ApplicationName,
    /// Release number of the successor.
    pub release_number: ReleaseNumber,
    /// Remote protocol of the successor.
    pub remote_protocol: RemoteProtocol,
    /// Remote address of the successor.
    pub remote_address: RemoteAddress,
    /// Remote port of the successor.
    pub remote_port: u16,
}

// ============================================================================
// SECTION: Resolved Endpoints
// ============================================================================

/// Resolved identifiers of the physical resources representing one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEndpoints {
    /// Identity endpoint recording name and release.
    pub identity: EndpointId,
    /// Transport endpoint recording protocol, address, and port.
    pub transport: EndpointId,
    /// Operation endpoints keyed by operation name.
    pub operations: BTreeMap<OperationName, EndpointId>,
}

/// Summary row returned by the application listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationSummary {
    /// Application name.
    pub application_name: ApplicationName,
    /// Release number.
    pub release_number: ReleaseNumber,
}
