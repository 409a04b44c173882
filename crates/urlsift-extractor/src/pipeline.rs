//! End-to-end extraction: route, extract, validate, observe

use crate::config::PipelineConfig;
use crate::error::ExtractorError;
use crate::registry::{DynStrategy, StrategyRegistry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use urlsift_domain::traits::PageFetcher;
use urlsift_domain::{ContentType, ExtractionResult, ExtractorConfig};
use urlsift_metrics::{ExtractionMetrics, ExtractionTimer};
use urlsift_router::{
    MatcherOptions, PatternType, StrategyMapping, StrategyRouter, UrlMappingManager,
};
use urlsift_schema::SchemaValidator;

/// Error type recorded for recoverable validation findings
const NON_CRITICAL: &str = "non_critical";
/// Error type recorded for missing required data
const REQUIRED: &str = "required";

/// Outcome of one routed extractor
#[derive(Debug)]
pub struct TargetedExtraction {
    /// The extractor reference from the routing table
    pub extractor: ExtractorConfig,
    /// Its result
    pub result: Result<ExtractionResult, ExtractorError>,
}

/// Outcomes of every extractor routed for one URL
#[derive(Debug)]
pub struct ExtractionReport {
    /// The page URL
    pub url: String,
    /// Outcomes in routing order
    pub outcomes: Vec<TargetedExtraction>,
}

impl ExtractionReport {
    /// Whether no extractor was routed
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Successful results grouped by target group, routing order kept
    pub fn by_target_group(&self) -> BTreeMap<&str, Vec<&ExtractionResult>> {
        let mut groups: BTreeMap<&str, Vec<&ExtractionResult>> = BTreeMap::new();
        for outcome in &self.outcomes {
            if let Ok(result) = &outcome.result {
                groups
                    .entry(outcome.extractor.target_group.as_str())
                    .or_default()
                    .push(result);
            }
        }
        groups
    }

    /// Failed extractors with their errors
    pub fn failures(&self) -> Vec<(&ExtractorConfig, &ExtractorError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.extractor, e)))
            .collect()
    }
}

/// Wires routing, strategies, validation and metrics together
///
/// Two resolution modes are exposed: [`extract`](Self::extract) runs the
/// single strategy chosen for a URL (first match wins, else the fallback),
/// [`extract_all`](Self::extract_all) runs every extractor the routing table
/// yields for it.
pub struct ExtractionPipeline {
    config: PipelineConfig,
    routes: UrlMappingManager,
    strategy_routes: StrategyRouter<DynStrategy>,
    strategies: StrategyRegistry,
    validator: SchemaValidator,
    metrics: Arc<ExtractionMetrics>,
}

impl ExtractionPipeline {
    /// Create a pipeline with an empty routing table
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Config`] for an invalid configuration and
    /// [`ExtractorError::UnknownStrategy`] if the fallback strategy is not
    /// registered.
    pub fn new(
        config: PipelineConfig,
        strategies: StrategyRegistry,
        validator: SchemaValidator,
        metrics: Arc<ExtractionMetrics>,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let fallback = strategies.get(&config.fallback_strategy)?;

        Ok(Self {
            config,
            routes: UrlMappingManager::new(),
            strategy_routes: StrategyRouter::new(fallback),
            strategies,
            validator,
            metrics,
        })
    }

    /// Replace the extractor routing table
    pub fn with_routes(mut self, routes: UrlMappingManager) -> Self {
        self.routes = routes;
        self
    }

    /// Route URLs matching `pattern` to a registered strategy
    pub fn add_strategy_route(
        &mut self,
        pattern: &str,
        pattern_type: PatternType,
        options: MatcherOptions,
        strategy_name: &str,
        priority: i32,
    ) -> Result<(), ExtractorError> {
        let strategy = self.strategies.get(strategy_name)?;
        let mapping = StrategyMapping::new(pattern, pattern_type, options, strategy, priority)
            .map_err(|e| ExtractorError::Config(e.to_string()))?;
        self.strategy_routes.add_mapping(mapping);
        Ok(())
    }

    /// Withdraw the strategy route registered for `pattern`
    ///
    /// Returns `false` if no route uses that pattern and type.
    pub fn remove_strategy_route(&mut self, pattern: &str, pattern_type: PatternType) -> bool {
        let Some(mapping) = self
            .strategy_routes
            .mappings()
            .iter()
            .find(|m| m.pattern() == pattern && m.pattern_type() == pattern_type)
            .cloned()
        else {
            return false;
        };
        self.strategy_routes.remove_mapping(&mapping)
    }

    /// The extractor routing table
    pub fn routes(&self) -> &UrlMappingManager {
        &self.routes
    }

    /// Mutable access to the extractor routing table
    pub fn routes_mut(&mut self) -> &mut UrlMappingManager {
        &mut self.routes
    }

    /// The strategy catalog
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    /// The schema validator
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// The metrics registry
    pub fn metrics(&self) -> &Arc<ExtractionMetrics> {
        &self.metrics
    }

    /// The configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extractors the routing table yields for `url`
    pub fn resolve_all_extractors(&self, url: &str) -> Vec<ExtractorConfig> {
        self.routes.resolve_all_extractors(url)
    }

    /// The single strategy chosen for `url`
    pub fn resolve_single_strategy(&self, url: &str) -> Arc<DynStrategy> {
        self.strategy_routes.resolve_single_strategy(url)
    }

    /// Run the strategy chosen for `url` and validate its result
    ///
    /// `content_type` names the schema to validate against; without it the
    /// strategy's category is used. The general fallback also records the
    /// type detected from the content as `_metadata.detected_content_type`.
    pub async fn extract(
        &self,
        url: &str,
        content: &str,
        content_type: Option<&str>,
    ) -> Result<ExtractionResult, ExtractorError> {
        let strategy = self.resolve_single_strategy(url);
        self.run(strategy.as_ref(), url, content, None, content_type).await
    }

    /// Run every extractor routed for `url`
    ///
    /// Extractors run one after another. A failing extractor does not stop
    /// the others; its error is kept in the report. Extractor params may
    /// carry an `instruction` override and a `content_type` hint.
    pub async fn extract_all(&self, url: &str, content: &str) -> ExtractionReport {
        let extractors = self.resolve_all_extractors(url);
        if extractors.is_empty() {
            info!("No extractors routed for {}", url);
        }

        let mut outcomes = Vec::with_capacity(extractors.len());
        for extractor in extractors {
            let instruction = param_str(&extractor, "instruction");
            let content_type = param_str(&extractor, "content_type");

            let result = match self.strategies.get(&extractor.extractor_id) {
                Ok(strategy) => {
                    self.run(strategy.as_ref(), url, content, instruction, content_type)
                        .await
                }
                Err(e) => {
                    warn!("Routed extractor '{}' is not registered", extractor.extractor_id);
                    Err(e)
                }
            };
            outcomes.push(TargetedExtraction { extractor, result });
        }

        ExtractionReport {
            url: url.to_string(),
            outcomes,
        }
    }

    /// Fetch `url` and run its single strategy
    pub async fn process_url<F>(
        &self,
        fetcher: &F,
        url: &str,
    ) -> Result<ExtractionResult, ExtractorError>
    where
        F: PageFetcher + ?Sized,
        F::Error: fmt::Display,
    {
        let content = fetcher
            .fetch(url)
            .await
            .map_err(|e| ExtractorError::Fetch(e.to_string()))?;
        self.extract(url, &content, None).await
    }

    async fn run(
        &self,
        strategy: &DynStrategy,
        url: &str,
        content: &str,
        instruction: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<ExtractionResult, ExtractorError> {
        let label = content_type
            .map(str::to_string)
            .unwrap_or_else(|| strategy.category().as_str().to_string());

        let timer = ExtractionTimer::start(&self.metrics, label.as_str());
        self.metrics.observe_content_size(&label, content.len());

        let raw = match strategy.extract(url, content, instruction, None).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Strategy '{}' failed for {}: {}", strategy.name(), url, e);
                timer.failure(e.error_type());
                return Err(e);
            }
        };

        let mut result = if self.config.validate_results {
            match self
                .validator
                .validate_and_enhance(raw, content, Some(url), Some(&label))
            {
                Ok(result) => result,
                Err(e) => {
                    for _ in e.validation_errors() {
                        self.metrics.record_validation_error(&label, REQUIRED);
                    }
                    let e = ExtractorError::from(e);
                    timer.failure(e.error_type());
                    return Err(e);
                }
            }
        } else {
            raw
        };

        if content_type.is_none() && strategy.category() == ContentType::General {
            let detected = self.validator.registry().generate_dynamic_schema(content, Some(url));
            result.set_metadata("detected_content_type", detected.as_str());
        }

        let recoverable = result
            .metadata()
            .and_then(|m| m.get("validation_errors"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        for _ in 0..recoverable {
            self.metrics.record_validation_error(&label, NON_CRITICAL);
        }

        let quality = self.metrics.observe_result(&label, &result);
        self.record_cost(&result);
        let elapsed = timer.success();
        info!(
            "Extracted {} with '{}' as {} (quality {:.2}, {:.2}s)",
            url,
            strategy.name(),
            label,
            quality,
            elapsed.as_secs_f64()
        );
        Ok(result)
    }
}

impl ExtractionPipeline {
    fn record_cost(&self, result: &ExtractionResult) {
        let (Some(model), Some(usage)) = (result.model(), result.usage()) else {
            return;
        };
        if let Some(usd) = self.config.estimate_cost(model, &usage) {
            debug!("Estimated cost for {}: ${:.6}", model, usd);
            self.metrics.record_cost(model, usd);
        }
    }
}

impl fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionPipeline")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("strategy_routes", &self.strategy_routes.len())
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}

fn param_str<'a>(extractor: &'a ExtractorConfig, key: &str) -> Option<&'a str> {
    extractor.params.get(key).and_then(Value::as_str)
}
