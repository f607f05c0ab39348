//! Registry for all treatment-process plugins.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::{ProcessKind, ProcessMeta};
use crate::ports::{EngineError, TreatmentProcess};

/// A treatment process bundled with its metadata.
pub struct ProcessPlugin {
    /// Static metadata describing the technology.
    pub meta: ProcessMeta,
    /// Implementation computing direct emissions.
    pub process: Arc<dyn TreatmentProcess>,
}

impl ProcessPlugin {
    /// Bundle a process with the metadata it reports.
    #[must_use]
    pub fn new(process: Arc<dyn TreatmentProcess>) -> Self {
        Self {
            meta: process.meta().clone(),
            process,
        }
    }
}

/// Registry that resolves plugins by process kind.
///
/// Iteration follows [`ProcessKind`] order so batch runs are reproducible.
pub struct ProcessRegistry {
    plugins: BTreeMap<ProcessKind, ProcessPlugin>,
}

impl ProcessRegistry {
    /// Build a registry from the provided plugin list.
    ///
    /// A later plugin replaces an earlier one of the same kind.
    #[must_use]
    pub fn new(plugins: Vec<ProcessPlugin>) -> Self {
        let plugins_map = plugins
            .into_iter()
            .map(|plugin| (plugin.meta.kind, plugin))
            .collect();
        Self {
            plugins: plugins_map,
        }
    }

    /// Return metadata for all registered processes.
    #[must_use]
    pub fn processes(&self) -> Vec<ProcessMeta> {
        self.plugins
            .values()
            .map(|plugin| plugin.meta.clone())
            .collect()
    }

    /// Registered process kinds in order.
    pub fn kinds(&self) -> impl Iterator<Item = ProcessKind> + '_ {
        self.plugins.keys().copied()
    }

    /// Look up a plugin for the given process kind.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedProcess`] when no plugin is registered.
    pub fn plugin(&self, kind: ProcessKind) -> Result<&ProcessPlugin, EngineError> {
        self.plugins
            .get(&kind)
            .ok_or(EngineError::UnsupportedProcess(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmissionResult, Pollutant, Quantity, ScenarioParameters};
    use crate::waste::WasteStream;

    struct FixedProcess {
        meta: ProcessMeta,
        co2: f64,
    }

    impl TreatmentProcess for FixedProcess {
        fn meta(&self) -> &ProcessMeta {
            &self.meta
        }

        fn calculate(
            &self,
            _waste: &WasteStream,
            _scenario: Option<&ScenarioParameters>,
        ) -> Result<EmissionResult, EngineError> {
            Ok([(Pollutant::Co2Fossil, Quantity::kilograms(self.co2))]
                .into_iter()
                .collect())
        }
    }

    fn fixed(kind: ProcessKind, co2: f64) -> ProcessPlugin {
        ProcessPlugin::new(Arc::new(FixedProcess {
            meta: ProcessMeta::from(kind),
            co2,
        }))
    }

    #[test]
    fn resolves_registered_plugins() {
        let registry = ProcessRegistry::new(vec![
            fixed(ProcessKind::Microwave, 1.0),
            fixed(ProcessKind::Incineration, 2.0),
        ]);

        let kinds: Vec<_> = registry.kinds().collect();
        assert_eq!(kinds, vec![ProcessKind::Incineration, ProcessKind::Microwave]);
        assert_eq!(registry.processes().len(), 2);
        assert!(registry.plugin(ProcessKind::Incineration).is_ok());
    }

    #[test]
    fn unknown_kind_is_unsupported() {
        let registry = ProcessRegistry::new(vec![fixed(ProcessKind::Landfill, 1.0)]);
        assert!(matches!(
            registry.plugin(ProcessKind::Autoclave),
            Err(EngineError::UnsupportedProcess(ProcessKind::Autoclave))
        ));
    }

    #[test]
    fn later_plugin_replaces_earlier() {
        let registry = ProcessRegistry::new(vec![
            fixed(ProcessKind::Landfill, 1.0),
            fixed(ProcessKind::Landfill, 5.0),
        ]);
        let waste = WasteStream::new(Quantity::kilograms(1.0), crate::waste::Composition::new())
            .expect("valid mass");
        let plugin = registry.plugin(ProcessKind::Landfill).expect("registered");
        let result = plugin.process.calculate(&waste, None).expect("fixed output");
        assert_eq!(result.magnitude(Pollutant::Co2Fossil), 5.0);
    }
}
