//! Material and classification reference data

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::core::loader::{self, LoadError};
use crate::core::project::Project;
use crate::core::quantity::Quantity;
use crate::core::units::Unit;
use crate::entities::{MaterialPricingProfile, PartClassification, Price, PricingType};

/// Lookup of pricing reference data
pub trait ReferenceData {
    /// Material by exact name
    fn material(&self, name: &str) -> Option<&MaterialPricingProfile>;

    /// Classification by id (or name, where the implementation allows)
    fn classification(&self, id: &str) -> Option<&PartClassification>;
}

impl<T: ReferenceData + ?Sized> ReferenceData for &T {
    fn material(&self, name: &str) -> Option<&MaterialPricingProfile> {
        (**self).material(name)
    }

    fn classification(&self, id: &str) -> Option<&PartClassification> {
        (**self).classification(id)
    }
}

impl<T: ReferenceData + ?Sized> ReferenceData for Arc<T> {
    fn material(&self, name: &str) -> Option<&MaterialPricingProfile> {
        (**self).material(name)
    }

    fn classification(&self, id: &str) -> Option<&PartClassification> {
        (**self).classification(id)
    }
}

/// In-memory reference data
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    materials: BTreeMap<String, MaterialPricingProfile>,
    classifications: BTreeMap<String, PartClassification>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `materials.yaml` and `classifications.yaml` from a project
    pub fn load(project: &Project) -> Result<Self, LoadError> {
        Self::from_files(&project.materials_path(), &project.classifications_path())
    }

    pub fn from_files(materials: &Path, classifications: &Path) -> Result<Self, LoadError> {
        let materials: Vec<MaterialPricingProfile> = loader::load_yaml(materials)?;
        let classifications: Vec<PartClassification> = loader::load_yaml(classifications)?;
        let catalog = materials
            .into_iter()
            .fold(Self::new(), |c, m| c.with_material(m));
        let catalog = classifications
            .into_iter()
            .fold(catalog, |c, k| c.with_classification(k));
        tracing::debug!(
            materials = catalog.materials.len(),
            classifications = catalog.classifications.len(),
            "loaded reference data"
        );
        Ok(catalog)
    }

    /// Built-in reference data written by `partcost init`
    pub fn seed() -> Self {
        let per_cm3 = Price::per_cubic_centimeter;
        let material = |name: &str, density: f64, block: f64, sheet: f64| {
            MaterialPricingProfile::new(
                name,
                Quantity::new(density, Unit::GRAM_PER_CUBIC_CENTIMETER),
                per_cm3(block),
                per_cm3(sheet),
            )
        };

        // Densities are all g/cm³, so construction cannot fail
        let mut catalog = Self::new();
        for profile in [
            material("Aluminum 6061", 2.7, 0.01, 0.008),
            material("Steel 1018", 7.87, 0.004, 0.003),
            material("Brass 360", 8.5, 0.03, 0.025),
        ]
        .into_iter()
        .flatten()
        {
            catalog = catalog.with_material(profile);
        }

        catalog
            .with_classification(PartClassification {
                description: Some("Milled from rectangular bar or plate".to_string()),
                ..PartClassification::new("machined-block", "Machined Block", PricingType::Block)
            })
            .with_classification(PartClassification {
                description: Some("Cut and formed from sheet stock".to_string()),
                ..PartClassification::new("sheet-metal", "Sheet Metal", PricingType::Sheet)
            })
    }

    pub fn with_material(mut self, material: MaterialPricingProfile) -> Self {
        self.materials.insert(material.name().to_string(), material);
        self
    }

    pub fn with_classification(mut self, classification: PartClassification) -> Self {
        self.classifications
            .insert(classification.id.clone(), classification);
        self
    }

    pub fn materials(&self) -> impl Iterator<Item = &MaterialPricingProfile> {
        self.materials.values()
    }

    pub fn classifications(&self) -> impl Iterator<Item = &PartClassification> {
        self.classifications.values()
    }

    /// Write the catalog as project reference files
    pub fn save(&self, materials: &Path, classifications: &Path) -> Result<(), LoadError> {
        loader::save_yaml(materials, &self.materials().collect::<Vec<_>>())?;
        loader::save_yaml(classifications, &self.classifications().collect::<Vec<_>>())
    }
}

impl ReferenceData for Catalog {
    fn material(&self, name: &str) -> Option<&MaterialPricingProfile> {
        self.materials.get(name)
    }

    fn classification(&self, id: &str) -> Option<&PartClassification> {
        self.classifications
            .get(id)
            .or_else(|| self.classifications.values().find(|c| c.name == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_seed_contents() {
        let catalog = Catalog::seed();
        let al = catalog.material("Aluminum 6061").unwrap();
        assert_eq!(al.density(), Quantity::new(2.7, Unit::GRAM_PER_CUBIC_CENTIMETER));
        assert_eq!(al.block_price().value(), 0.01);
        assert_eq!(catalog.materials().count(), 3);
        assert_eq!(
            catalog.classification("sheet-metal").unwrap().pricing_type,
            PricingType::Sheet
        );
        assert!(catalog.material("aluminum 6061").is_none());
    }

    #[test]
    fn test_classification_by_name() {
        let catalog = Catalog::seed();
        let by_name = catalog.classification("Machined Block").unwrap();
        assert_eq!(by_name.id, "machined-block");
        assert!(catalog.classification("machined block").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let materials = dir.path().join("materials.yaml");
        let classes = dir.path().join("classifications.yaml");
        Catalog::seed().save(&materials, &classes).unwrap();

        let loaded = Catalog::from_files(&materials, &classes).unwrap();
        assert_eq!(loaded.materials().count(), 3);
        assert_eq!(loaded.classifications().count(), 2);
        assert_eq!(
            loaded.material("Brass 360").unwrap().density().value(),
            8.5
        );
    }

    #[test]
    fn test_blanket_impls() {
        fn lookup<R: ReferenceData>(r: R) -> bool {
            r.material("Steel 1018").is_some()
        }
        let catalog = Arc::new(Catalog::seed());
        assert!(lookup(&*catalog));
        assert!(lookup(Arc::clone(&catalog)));
    }
}
