use super::VideoCatalog;
use crate::utils::normalize_handle;
use crate::HarvestError;

/// Maps public channel handles to channel and uploads playlist ids
pub struct ChannelResolver<'a> {
    catalog: &'a dyn VideoCatalog,
}

impl<'a> ChannelResolver<'a> {
    pub fn new(catalog: &'a dyn VideoCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve a handle to a channel id.
    ///
    /// Tries the exact handle lookup first and falls back to a channel search for the
    /// bare name, which also covers legacy custom names that never became handles.
    pub async fn resolve(&self, handle: &str) -> Result<String, HarvestError> {
        let normalized = normalize_handle(handle).ok_or_else(|| HarvestError::Resolution {
            handle: handle.to_string(),
            reason: "not a valid channel handle".to_string(),
        })?;
        let failed = |e: anyhow::Error| HarvestError::Resolution {
            handle: normalized.clone(),
            reason: format!("{:#}", e),
        };

        tracing::info!("Resolving channel handle {} via {}", normalized, self.catalog.provider_name());

        if let Some(channel_id) = self
            .catalog
            .channel_id_for_handle(&normalized)
            .await
            .map_err(failed)?
        {
            tracing::debug!("Handle {} resolved to {}", normalized, channel_id);
            return Ok(channel_id);
        }

        let name = normalized.trim_start_matches('@');
        tracing::debug!("No exact match for {}, searching for '{}'", normalized, name);

        match self.catalog.search_channel_id(name).await.map_err(failed)? {
            Some(channel_id) => {
                tracing::warn!(
                    "Handle {} matched channel {} by search, verify it is the intended channel",
                    normalized,
                    channel_id
                );
                Ok(channel_id)
            }
            None => Err(HarvestError::Resolution {
                handle: normalized,
                reason: "channel not found".to_string(),
            }),
        }
    }

    /// Find the playlist holding every upload of `channel_id`
    pub async fn uploads_playlist(&self, channel_id: &str) -> Result<String, HarvestError> {
        self.catalog
            .uploads_playlist_id(channel_id)
            .await
            .map_err(|e| HarvestError::Listing(format!("uploads playlist lookup failed: {:#}", e)))?
            .ok_or_else(|| {
                HarvestError::Listing(format!("channel {} has no uploads playlist", channel_id))
            })
    }
}
