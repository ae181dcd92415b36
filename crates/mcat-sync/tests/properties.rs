use mcat_catalog::{is_canonical, Catalog, Keyed};
use mcat_sync::Reconciler;
use mcat_test_utils::strategies::{catalog, observed};
use proptest::prelude::*;

fn keys<T: Keyed>(items: &[T]) -> Vec<String> {
    items.iter().map(|i| i.key().to_string()).collect()
}

fn assert_canonical(catalog: &Catalog) {
    assert!(is_canonical(&catalog.components));
    for component in &catalog.components {
        assert!(is_canonical(&component.rows));
        for row in &component.rows {
            assert!(is_canonical(&row.labels));
            for label in &row.labels {
                assert!(is_canonical(&label.values));
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_reconcile_is_idempotent(old in catalog(), new in observed()) {
        let reconciler = Reconciler::new();
        let once = reconciler.reconcile(old, new.clone());
        let twice = reconciler.reconcile(once.clone(), new);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_output_is_sorted(old in catalog(), new in observed()) {
        let merged = Reconciler::new().reconcile(old, new);
        assert_canonical(&merged);
    }

    #[test]
    fn prop_bootstrap_returns_observed(version in "[0-9.]{0,5}", snapshot in catalog()) {
        let merged = Reconciler::new().reconcile(Catalog::new(version.clone()), snapshot.clone());
        prop_assert_eq!(merged.version, version);
        prop_assert_eq!(merged.components, snapshot.components);
    }

    #[test]
    fn prop_membership_follows_snapshot(old in catalog(), new in observed()) {
        let merged = Reconciler::new().reconcile(old, new.clone());

        prop_assert_eq!(keys(&merged.components), keys(&new.components));
        for component in &merged.components {
            let observed = new.component(&component.prefix).unwrap();
            prop_assert_eq!(keys(&component.rows), keys(&observed.rows));
            for row in &component.rows {
                let observed = observed.row(&row.name).unwrap();
                prop_assert_eq!(keys(&row.labels), keys(&observed.labels));
            }
        }
    }

    #[test]
    fn prop_structure_refreshed_curation_kept(old in catalog(), new in observed()) {
        let merged = Reconciler::new().reconcile(old.clone(), new.clone());

        for component in &merged.components {
            let observed_component = new.component(&component.prefix).unwrap();
            let persisted_component = old.component(&component.prefix);
            if let Some(persisted) = persisted_component {
                prop_assert_eq!(&component.title, &persisted.title);
                prop_assert_eq!(&component.description, &persisted.description);
            }

            for row in &component.rows {
                let observed = observed_component.row(&row.name).unwrap();
                prop_assert_eq!(row.kind, observed.kind);
                prop_assert_eq!(&row.help, &observed.help);
                prop_assert_eq!(&row.unit, &observed.unit);

                let persisted_row = persisted_component.and_then(|c| c.row(&row.name));
                if let Some(persisted) = persisted_row {
                    prop_assert_eq!(&row.since, &persisted.since);
                }

                for label in &row.labels {
                    prop_assert_eq!(label.fixed, observed.label(&label.name).unwrap().fixed);
                    let persisted_label = persisted_row.and_then(|r| r.label(&label.name));
                    if let Some(persisted) = persisted_label {
                        prop_assert_eq!(&label.description, &persisted.description);
                        if persisted.manually_edited {
                            prop_assert_eq!(&label.values, &persisted.values);
                        }
                    }
                }
            }
        }
    }
}
