//! Built-in tool callbacks for charla.
//!
//! Tools give the engine access to HR systems while answering employee
//! queries: the employee directory, the company policy handbook, and the
//! benefits catalog. Each is a stub backed by mock data with realistic
//! shapes, so the full pipeline can be exercised end to end.

pub mod benefits_system;
pub mod company_policies;
pub mod employee_data;

use charla_core::tool::{ToolDescriptor, ToolRegistry};
use tracing::{info, warn};

/// Create the default tool registry with all built-in tools.
///
/// Registration order is meaningful: it is the order reported by discovery
/// and by the assistant's tool list.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(employee_data::EmployeeDataTool));
    registry.register(Box::new(company_policies::CompanyPoliciesTool));
    registry.register(Box::new(benefits_system::BenefitsSystemTool));
    registry
}

/// Enumerate the registered tools once at startup, logging each descriptor.
///
/// An empty registry is not fatal — the pipeline still functions, simply
/// without tool augmentation.
pub fn discover(registry: &ToolRegistry) -> Vec<ToolDescriptor> {
    let descriptors = registry.descriptors();

    if descriptors.is_empty() {
        warn!("no tools registered; the engine will run without tool augmentation");
        return descriptors;
    }

    info!("=== Herramientas disponibles ===");
    for descriptor in &descriptors {
        info!(tool = %descriptor.name, description = %descriptor.description, "tool discovered");
    }
    info!("================================");

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_order() {
        let registry = default_registry();
        assert_eq!(
            registry.names(),
            vec!["employee_data", "company_policies", "benefits_system"]
        );
    }

    #[test]
    fn discover_returns_ordered_descriptors() {
        let registry = default_registry();
        let descriptors = discover(&registry);
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].name, "employee_data");
        assert!(!descriptors[0].description.is_empty());
    }

    #[test]
    fn discover_empty_registry_is_not_fatal() {
        let registry = ToolRegistry::new();
        assert!(discover(&registry).is_empty());
    }
}
