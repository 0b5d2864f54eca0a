pub mod holiday;
pub mod report;
pub mod subject;
pub mod system;
pub mod term;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(report::definitions())
        .chain(subject::definitions())
        .chain(holiday::definitions())
        .chain(term::definitions())
    {
        registry.register(entry);
    }
}
