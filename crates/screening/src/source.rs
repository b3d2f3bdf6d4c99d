use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::token::{DiscoveredToken, RugReport};

/// Feed of newly listed tokens and per-token risk reports.
///
/// Implementations are thin I/O wrappers over whatever backs discovery
/// (aggregator APIs, websocket feeds, fixtures in tests). The scanner
/// treats a failed `rug_report` as the neutral report rather than aborting
/// the batch.
#[async_trait]
pub trait TokenMetadataSource: Send + Sync {
    /// Tokens currently visible on the discovery feed
    async fn discovered_tokens(&self) -> Result<Vec<DiscoveredToken>>;

    /// Risk report for a single mint
    async fn rug_report(&self, mint: &Pubkey) -> Result<RugReport>;
}
