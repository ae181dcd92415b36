//! Persisted YAML document codec
//!
//! The on-disk field names (`desc`, `metrics`, `manually_edit`, ...) are kept
//! compatible with catalogs written by earlier tooling. Missing fields default,
//! so hand-written documents may omit anything but the keys.

use crate::catalog::Catalog;
use crate::error::CatalogError;

impl Catalog {
    /// Decode a persisted catalog
    ///
    /// An empty (or whitespace-only) document decodes to an empty catalog.
    ///
    /// # Errors
    /// - [`CatalogError::Decode`] if the YAML is malformed or mistyped
    /// - [`CatalogError::DuplicateKey`] if any sequence repeats a key
    pub fn from_yaml(document: &str) -> Result<Self, CatalogError> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }

        let catalog: Self = serde_yaml::from_str(document).map_err(CatalogError::Decode)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Encode the catalog as a YAML document
    ///
    /// # Errors
    /// Returns [`CatalogError::Encode`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        serde_yaml::to_string(self).map_err(CatalogError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Component, Label, LabelValue, MetricKind, Row};
    use pretty_assertions::assert_eq;

    const LEGACY: &str = r"
version: 2.0.0
components:
- prefix: kata_hypervisor
  title: Kata hypervisor metrics
  desc: Metrics collected from the hypervisor process.
  metrics:
  - name: kata_hypervisor_fds
    type: GAUGE
    unit: ''
    help: Open FDs for hypervisor.
    labels: []
    since: 2.0.0
  - name: kata_hypervisor_netdev
    type: GAUGE
    unit: bytes
    help: Net devices statistics.
    labels:
    - name: interface
      desc: network device name
      manually_edit: false
      fixed: false
      values: []
    - name: item
      desc: ''
      manually_edit: true
      fixed: true
      values:
      - value: recv_bytes
        desc: received bytes
      - value: sent_bytes
        desc: ''
    since: 2.0.0
";

    #[test]
    fn decodes_legacy_field_names() {
        let catalog = Catalog::from_yaml(LEGACY).unwrap();
        assert_eq!(catalog.version, "2.0.0");

        let component = catalog.component("kata_hypervisor").unwrap();
        assert_eq!(component.title, "Kata hypervisor metrics");
        assert_eq!(component.description, "Metrics collected from the hypervisor process.");
        assert_eq!(component.rows.len(), 2);

        let row = component.row("kata_hypervisor_netdev").unwrap();
        assert_eq!(row.kind, MetricKind::Gauge);
        assert_eq!(row.unit, "bytes");

        let item = row.label("item").unwrap();
        assert!(item.manually_edited);
        assert!(item.fixed);
        assert_eq!(item.value("recv_bytes").unwrap().description, "received bytes");
    }

    #[test]
    fn missing_fields_default() {
        let catalog = Catalog::from_yaml(
            r"
components:
- prefix: go_gc
  metrics:
  - name: go_gc_duration_seconds
    labels:
    - name: quantile
",
        )
        .unwrap();

        assert!(catalog.version.is_empty());
        let row = catalog.find_row("go_gc_duration_seconds").unwrap();
        assert_eq!(row.kind, MetricKind::Untyped);
        let label = row.label("quantile").unwrap();
        assert!(!label.fixed);
        assert!(!label.manually_edited);
        assert!(label.values.is_empty());
    }

    #[test]
    fn empty_document_is_empty_catalog() {
        assert_eq!(Catalog::from_yaml("").unwrap(), Catalog::default());
        assert_eq!(Catalog::from_yaml("  \n").unwrap(), Catalog::default());
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = Catalog::from_yaml("components: [prefix: ").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn rejects_duplicate_rows() {
        let err = Catalog::from_yaml(
            r"
components:
- prefix: go_gc
  metrics:
  - name: go_gc_duration_seconds
  - name: go_gc_duration_seconds
",
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { .. }));
    }

    #[test]
    fn encode_uses_persisted_field_names() {
        let catalog = Catalog::new("2.0.0").with_component(
            Component::new("go_memstats").with_row(
                Row::new("go_memstats_alloc_bytes", MetricKind::Gauge, "bytes allocated")
                    .with_unit("bytes")
                    .with_label(Label {
                        values: vec![LabelValue::new("heap").with_description("heap memory")],
                        ..Label::fixed("state", Vec::<String>::new()).manually_edited(true)
                    }),
            ),
        );

        let yaml = catalog.to_yaml().unwrap();
        assert!(yaml.contains("metrics:"));
        assert!(yaml.contains("type: GAUGE"));
        assert!(yaml.contains("manually_edit: true"));
        assert!(yaml.contains("desc: heap memory"));

        assert_eq!(Catalog::from_yaml(&yaml).unwrap(), catalog);
    }
}
