//! Optional event logger for debugging a host integration

use crate::event::{EventBus, HandlerId, Payload};
use crate::tree::TreeNode;
use log::info;

/// Log target used by [`attach_event_logger`]
pub const EVENT_LOG_TARGET: &str = "tree_editor::events";

/// Subscribe a handler that logs every event at info level
///
/// Remove it again with [`EventBus::off_any`].
pub fn attach_event_logger(bus: &EventBus) -> HandlerId {
    bus.on_any(|event| {
        info!(
            target: EVENT_LOG_TARGET,
            "{} {} {}",
            event.name,
            event.context.path(),
            describe(event.payload)
        );
        Ok(())
    })
}

fn describe(payload: &Payload) -> String {
    match payload {
        Payload::None => String::from("-"),
        Payload::Node(node) => format!("{} `{}`", node.kind(), node.name()),
        Payload::Name(change) | Payload::Content(change) => {
            format!("{:?} -> {:?}", change.previous, change.current)
        }
        Payload::Metadata(change) => {
            format!("{:?} -> {:?}", change.previous, change.current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Change;
    use crate::tree::Metadata;

    #[test]
    fn test_describe() {
        assert_eq!(describe(&Payload::None), "-");
        assert_eq!(
            describe(&Payload::Name(Change {
                current: "lib".into(),
                previous: "src".into()
            })),
            r#""src" -> "lib""#
        );
        let metadata: Metadata = [("k".to_string(), "v".to_string())].into();
        assert_eq!(
            describe(&Payload::Metadata(Change {
                current: metadata,
                previous: Metadata::new()
            })),
            r#"{} -> {"k": "v"}"#
        );
    }

    #[test]
    fn test_attach_and_detach() {
        let bus = EventBus::new();
        let id = attach_event_logger(&bus);
        assert_eq!(bus.any_handler_count(), 1);
        bus.off_any(id);
        assert_eq!(bus.any_handler_count(), 0);
    }
}
