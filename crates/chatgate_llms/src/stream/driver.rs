//! Pulls a response body through a [`Decoder`] under a deadline.

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};

use super::{Decoded, Decoder};
use crate::error::{Error, Result, redact};
use crate::transport::Deadline;
use crate::types::FragmentStream;

/// Turn a byte stream into a [`FragmentStream`].
///
/// Each read is raced against `deadline`. On completion, failure or expiry
/// the body is dropped before anything else is yielded, so the connection is
/// already released when the caller sees the final item. Dropping the
/// returned stream early drops the body with it.
///
/// Error text reported inside the stream has `secret` masked. A body that
/// ends without a single recognizable payload is a malformed response.
pub fn drive<S, D>(
    deadline: Deadline,
    body: S,
    mut decoder: D,
    secret: Option<String>,
) -> FragmentStream
where
    S: Stream<Item = Result<Bytes>> + Send + 'static,
    D: Decoder + 'static,
{
    let backend = deadline.backend();

    let stream = async_stream::stream! {
        let mut body = Box::pin(body);
        let mut failure: Option<Error> = None;

        'read: loop {
            let (decoded, exhausted) = match deadline.run(body.next()).await {
                Ok(Some(Ok(bytes))) => (decoder.feed(&bytes), false),
                Ok(None) => (decoder.finish(), true),
                Ok(Some(Err(e))) | Err(e) => {
                    failure = Some(e);
                    break 'read;
                }
            };

            for item in decoded {
                match item {
                    Decoded::Fragment(text) => yield Ok(text),
                    Decoded::Done => break 'read,
                    Decoded::Failed(message) => {
                        let message = redact(&message, secret.as_deref());
                        failure = Some(Error::wrap(backend, message));
                        break 'read;
                    }
                }
            }

            if exhausted {
                if decoder.payloads() == 0 {
                    failure = Some(Error::malformed(
                        backend,
                        "stream ended without a recognizable payload",
                    ));
                }
                break;
            }
        }

        drop(body);

        if let Some(e) = failure {
            yield Err(e);
        }
    };

    FragmentStream::new(backend, Box::pin(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::EventStreamDecoder;
    use crate::stream::NdjsonDecoder;
    use crate::stream::test_support::TextField;
    use crate::transport::PHASE_STREAM;
    use crate::types::Backend;
    use futures::stream;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::task::{Context, Poll};
    use std::time::Duration;

    /// Body stand-in that records when it is dropped.
    struct Tracked<S> {
        inner: S,
        dropped: Arc<AtomicBool>,
    }

    impl<S: Stream + Unpin> Stream for Tracked<S> {
        type Item = S::Item;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
            self.get_mut().inner.poll_next_unpin(cx)
        }
    }

    impl<S> Drop for Tracked<S> {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn reads(chunks: &[&'static str]) -> Vec<Result<Bytes>> {
        chunks
            .iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes())))
            .collect()
    }

    /// Yields `chunks`, then never completes.
    fn stalled(
        chunks: &[&'static str],
    ) -> (
        Tracked<impl Stream<Item = Result<Bytes>> + Send + Unpin + 'static>,
        Arc<AtomicBool>,
    ) {
        let dropped = Arc::new(AtomicBool::new(false));
        let inner = stream::iter(reads(chunks)).chain(stream::pending());
        (
            Tracked {
                inner,
                dropped: dropped.clone(),
            },
            dropped,
        )
    }

    fn long_deadline() -> Deadline {
        Deadline::new(Backend::Ollama, PHASE_STREAM, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_fragments_in_arrival_order_until_sentinel() {
        let body = stream::iter(reads(&[
            "data: {\"t\":\"one\"}\n\ndata: {\"t\":",
            "\" two\"}\n\n",
            "data: [DONE]\n\ndata: {\"t\":\"never\"}\n",
        ]));
        let decoder = EventStreamDecoder::new(TextField);
        let fragments: Vec<String> = drive(long_deadline(), body, decoder, None)
            .map(|f| f.unwrap())
            .collect()
            .await;

        assert_eq!(fragments, vec!["one", " two"]);
    }

    #[tokio::test]
    async fn test_end_of_body_without_done_flag_ends_cleanly() {
        let body = stream::iter(reads(&["{\"t\":\"a\"}\n{\"t\":\"b\"}"]));
        let text = drive(long_deadline(), body, NdjsonDecoder::new(TextField), None)
            .collect_text()
            .await
            .unwrap();
        assert_eq!(text, "ab");
    }

    #[tokio::test]
    async fn test_deadline_mid_stream_yields_timeout_and_releases_body() {
        let (body, dropped) = stalled(&["{\"t\":\"partial\"}\n"]);
        let deadline = Deadline::new(Backend::Gemini, PHASE_STREAM, Duration::from_millis(50));
        let mut fragments = drive(deadline, body, NdjsonDecoder::new(TextField), None);

        assert_eq!(fragments.next().await.unwrap().unwrap(), "partial");
        assert!(!dropped.load(Ordering::SeqCst));

        let err = fragments.next().await.unwrap().unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().starts_with("Gemini stream timed out"));
        assert!(dropped.load(Ordering::SeqCst));

        assert!(fragments.next().await.is_none());
    }

    #[tokio::test]
    async fn test_abandoning_stream_releases_body() {
        let (body, dropped) = stalled(&["data: {\"t\":\"first\"}\n"]);
        let decoder = EventStreamDecoder::new(TextField);
        let mut fragments = drive(long_deadline(), body, decoder, None);

        assert_eq!(fragments.next().await.unwrap().unwrap(), "first");
        drop(fragments);

        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_transport_error_is_last_item() {
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"{\"t\":\"x\"}\n")),
            Err(Error::wrap(Backend::Ollama, "connection reset")),
            Ok(Bytes::from_static(b"{\"t\":\"y\"}\n")),
        ]);
        let decoder = NdjsonDecoder::new(TextField);
        let items: Vec<Result<String>> = drive(long_deadline(), body, decoder, None)
            .collect()
            .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "x");
        assert_eq!(
            items[1].as_ref().unwrap_err().to_string(),
            "Ollama: connection reset"
        );
    }

    #[tokio::test]
    async fn test_in_band_error_is_tagged() {
        let body = stream::iter(reads(&["{\"err\":\"model not found\"}\n"]));
        let err = drive(long_deadline(), body, NdjsonDecoder::new(TextField), None)
            .collect_text()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Ollama: model not found");
    }

    #[tokio::test]
    async fn test_in_band_error_masks_secret() {
        let body = stream::iter(reads(&["{\"err\":\"invalid key sk-live-123\"}\n"]));
        let decoder = NdjsonDecoder::new(TextField);
        let err = drive(long_deadline(), body, decoder, Some("sk-live-123".to_string()))
            .collect_text()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Ollama: invalid key ***");
    }

    #[tokio::test]
    async fn test_body_without_any_payload_is_malformed() {
        let body = stream::iter(reads(&["<html>\n", "gateway error</html>\n"]));
        let err = drive(long_deadline(), body, NdjsonDecoder::new(TextField), None)
            .collect_text()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedResponse { backend: Backend::Ollama, .. }
        ));

        let empty = stream::iter(Vec::<Result<Bytes>>::new());
        let err = drive(long_deadline(), empty, EventStreamDecoder::new(TextField), None)
            .collect_text()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
