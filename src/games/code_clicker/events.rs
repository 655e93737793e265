/// Notifications the engine emits for the presentation layer. They carry no
/// behaviour; the UI uses them for flashes, notifications and the log.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// An item was bought and is now at `new_level`.
    Purchased { item_id: String, new_level: u32 },
    /// Lines per second was recomputed.
    RateChanged { resource_per_second: f64 },
}
