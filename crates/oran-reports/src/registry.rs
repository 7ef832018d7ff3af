use oran_abstract::{FieldValue, Report, ReportError, ReportKind, ReportType, TypeDescriptor};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::{
    AppLossReport, LocationReport, LteCellLoadReport, LteUeCellInfoReport, LteUeRsrpRsrqReport,
};

/// Zero-argument constructor producing a default-valued report.
pub type ReportFactory = Box<dyn Fn() -> Box<dyn Report> + Send + Sync>;

/// Opaque key handed out for each registered report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(u32);

struct Registration {
    handle: TypeHandle,
    descriptor: TypeDescriptor,
    factory: ReportFactory,
}

/// Maps report kinds to factories so reports can be built from a kind name
/// alone.
///
/// Populate it once at startup, then share it by reference. Registrations are
/// only removed by [`ReportRegistry::reset`].
#[derive(Default)]
pub struct ReportRegistry {
    entries: HashMap<&'static str, Registration>,
    next_handle: u32,
}

impl fmt::Debug for ReportRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportRegistry")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in report type.
    pub fn with_builtin_reports() -> Result<Self, ReportError> {
        let mut registry = Self::new();
        registry.register::<LteCellLoadReport>()?;
        registry.register::<LocationReport>()?;
        registry.register::<LteUeCellInfoReport>()?;
        registry.register::<AppLossReport>()?;
        registry.register::<LteUeRsrpRsrqReport>()?;
        Ok(registry)
    }

    pub fn register<T: ReportType>(&mut self) -> Result<TypeHandle, ReportError> {
        self.register_factory(
            T::descriptor(),
            Box::new(|| Box::new(T::default()) as Box<dyn Report>),
        )
    }

    /// Register a factory under `descriptor.kind`. Fails with
    /// [`ReportError::DuplicateKind`] if the kind is taken and with
    /// [`ReportError::KindMismatch`] if the factory builds another kind.
    pub fn register_factory(
        &mut self,
        descriptor: TypeDescriptor,
        factory: ReportFactory,
    ) -> Result<TypeHandle, ReportError> {
        let kind = descriptor.kind.as_str();
        if self.entries.contains_key(kind) {
            return Err(ReportError::DuplicateKind(kind.to_string()));
        }
        let produced = factory().kind();
        if produced != descriptor.kind {
            return Err(ReportError::KindMismatch {
                registered: kind.to_string(),
                produced: produced.to_string(),
            });
        }

        let handle = TypeHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.insert(
            kind,
            Registration {
                handle,
                descriptor,
                factory,
            },
        );
        debug!(
            "Registered report kind {} ({} fields) as {:?}",
            kind,
            descriptor.fields.len(),
            handle
        );
        Ok(handle)
    }

    /// Build a fresh, default-valued report of the given kind.
    pub fn create(&self, kind: &str) -> Result<Box<dyn Report>, ReportError> {
        let entry = self.lookup(kind)?;
        debug!("Creating report of kind {}", kind);
        Ok((entry.factory)())
    }

    /// [`create`](Self::create) followed by `set_field` for every pair.
    pub fn build<'a>(
        &self,
        kind: &str,
        fields: impl IntoIterator<Item = (&'a str, FieldValue)>,
    ) -> Result<Box<dyn Report>, ReportError> {
        let mut report = self.create(kind)?;
        for (name, value) in fields {
            report.set_field(name, value)?;
        }
        Ok(report)
    }

    /// Map a kind name to its static identifier.
    pub fn resolve(&self, kind: &str) -> Result<ReportKind, ReportError> {
        self.lookup(kind).map(|entry| entry.descriptor.kind)
    }

    pub fn descriptor(&self, kind: &str) -> Option<&TypeDescriptor> {
        self.entries.get(kind).map(|entry| &entry.descriptor)
    }

    pub fn handle(&self, kind: &str) -> Option<TypeHandle> {
        self.entries.get(kind).map(|entry| entry.handle)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> impl Iterator<Item = ReportKind> + '_ {
        let mut kinds: Vec<_> = self.entries.values().map(|e| e.descriptor.kind).collect();
        kinds.sort();
        kinds.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every registration. Handles issued before the reset are not reused.
    pub fn reset(&mut self) {
        debug!("Resetting report registry ({} kinds)", self.entries.len());
        self.entries.clear();
    }

    fn lookup(&self, kind: &str) -> Result<&Registration, ReportError> {
        self.entries
            .get(kind)
            .ok_or_else(|| ReportError::UnknownKind(kind.to_string()))
    }
}
