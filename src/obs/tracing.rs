// self
use crate::{_prelude::*, cache::CacheError, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by credential flows and gateway calls.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("zoho_sign.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Reports a cache failure that the caller downgraded to a miss.
pub fn cache_fault(key: &str, operation: &'static str, error: &CacheError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(key, operation, %error, "token cache unavailable; treating as a miss");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, operation, error);
	}
}

/// Reports a cache lookup outcome at debug level.
pub fn cache_lookup(key: &str, hit: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(key, hit, "token cache lookup");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, hit);
	}
}

/// Reports a response body that was passed through undecoded.
pub fn raw_payload(status: u16, content_type: Option<&str>, bytes: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(status, content_type, bytes, "response body is not a JSON envelope");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, content_type, bytes);
	}
}
