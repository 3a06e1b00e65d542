//! One-shot status messages carried in the session until the next rendered page.

use tower_sessions::Session;

use super::WebError;

const FLASH_KEY: &str = "_flashes";

/// Queue a message for the next page this session renders.
pub async fn flash(session: &Session, message: impl Into<String>) -> Result<(), WebError> {
    let mut messages = session
        .get::<Vec<String>>(FLASH_KEY)
        .await
        .map_err(|e| WebError::internal(format!("Session error: {e}")))?
        .unwrap_or_default();

    messages.push(message.into());

    session
        .insert(FLASH_KEY, messages)
        .await
        .map_err(|e| WebError::internal(format!("Session error: {e}")))
}

/// Drain queued messages. A second call returns nothing.
pub async fn take_flashes(session: &Session) -> Result<Vec<String>, WebError> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await
        .map_err(|e| WebError::internal(format!("Session error: {e}")))?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn flashes_are_delivered_once_in_order() {
        let session = session();
        flash(&session, "Item created.").await.unwrap();
        flash(&session, "Goodbye.").await.unwrap();

        assert_eq!(
            take_flashes(&session).await.unwrap(),
            vec!["Item created.".to_string(), "Goodbye.".to_string()]
        );
        assert!(take_flashes(&session).await.unwrap().is_empty());
    }
}
