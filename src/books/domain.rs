use crate::core::domain::Identifiable;

pub mod model;

pub(crate) trait Book: Identifiable {
    fn title(&self) -> String;
    fn is_available(&self) -> bool;
}
