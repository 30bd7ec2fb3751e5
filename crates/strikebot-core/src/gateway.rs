//! Gateway - messaging platform capabilities used by the core
//!
//! The concrete platform adapter implements [`ModerationGateway`]; the core
//! only sees member ids, role ids and channel ids.

use crate::error::Result;
use crate::record::{ChannelId, MemberId, RoleId};
use async_trait::async_trait;

/// Side effects the strike service needs from the chat platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationGateway: Send + Sync {
    /// Remove `roles` from `member`
    async fn remove_roles(&self, member: &MemberId, roles: &[RoleId], reason: &str) -> Result<()>;

    /// Send a private message to `member`
    ///
    /// Returns [`crate::Error::PrivateMessageUnavailable`] when the member
    /// does not accept private messages.
    async fn send_private(&self, member: &MemberId, text: &str) -> Result<()>;

    /// Post a message in a channel
    async fn send_public(&self, channel: ChannelId, text: &str) -> Result<()>;
}
