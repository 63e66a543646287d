/// Autocomplete routing: forward the focused option's partial input to that
/// option's suggestion provider.
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, error, info};

use slashwire_core::{AutocompleteInteraction, Choice};

use crate::dispatch::RouterSettings;
use crate::registry::Registry;
use crate::types::CommandPath;

/// Lazy, finite suggestion sequence. Consumed once.
pub type Suggestions = BoxStream<'static, String>;

/// Supplies completions for one option's partial input.
#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
    async fn suggest(&self, input: String) -> Result<Suggestions>;
}

/// Adapter turning an async function returning a collection into an [`AutocompleteProvider`].
pub struct ProviderFn<F>(F);

pub fn provider_fn<F, Fut, I>(f: F) -> ProviderFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<I>> + Send + 'static,
    I: IntoIterator<Item = String> + Send + 'static,
    I::IntoIter: Send + 'static,
{
    ProviderFn(f)
}

#[async_trait]
impl<F, Fut, I> AutocompleteProvider for ProviderFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<I>> + Send + 'static,
    I: IntoIterator<Item = String> + Send + 'static,
    I::IntoIter: Send + 'static,
{
    async fn suggest(&self, input: String) -> Result<Suggestions> {
        let items = (self.0)(input).await?;
        Ok(stream::iter(items).boxed())
    }
}

/// What happened to one autocomplete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteOutcome {
    /// No command, option or provider matched; nothing was sent.
    Unhandled,
    /// Suggestions were produced. `delivered` is false when the response could not be sent.
    Responded { suggestions: usize, delivered: bool },
    /// The provider itself failed; nothing was sent.
    ProviderFailed,
}

/// Route one autocomplete request to the focused option's provider.
///
/// Suggestions keep provider order and use the same string as label and
/// value. Provider and delivery failures are logged, never returned.
pub async fn dispatch_autocomplete(
    registry: &Registry,
    interaction: Arc<dyn AutocompleteInteraction>,
    settings: &RouterSettings,
) -> AutocompleteOutcome {
    let path = CommandPath::from_source(&*interaction);
    let Some(leaf) = registry.resolve(&path) else {
        debug!(command = %path, "No registered command matches autocomplete; ignoring");
        return AutocompleteOutcome::Unhandled;
    };

    let focused = interaction.focused();
    let Some(provider) = leaf.option_spec(&focused.name).and_then(|spec| spec.autocomplete()) else {
        debug!(command = %path, option = %focused.name, "Option has no autocomplete provider");
        return AutocompleteOutcome::Unhandled;
    };

    let suggestions = match provider.suggest(focused.value).await {
        Ok(stream) => stream.take(settings.max_choices).map(Choice::same).collect::<Vec<_>>().await,
        Err(e) => {
            error!(command = %path, option = %focused.name, error = ?e, "Autocomplete provider failed");
            return AutocompleteOutcome::ProviderFailed;
        }
    };

    let count = suggestions.len();
    info!(command = %path, option = %focused.name, suggestions = count, "Responding to autocomplete");
    let delivered = match interaction.respond(suggestions).await {
        Ok(()) => true,
        Err(e) => {
            error!(command = %path, error = %e, "Failed to send autocomplete suggestions");
            false
        }
    };
    AutocompleteOutcome::Responded { suggestions: count, delivered }
}
