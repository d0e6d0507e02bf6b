#![forbid(unsafe_code)]

//! Every pack runs inside a `pack` span on `offergrid.pack`, including packs
//! that fail.
//!
//! Run:
//!   cargo test -p offergrid-layout --test pack_tracing

use std::sync::{Arc, Mutex};

use offergrid_layout::{FlowDirection, PackError, SizeClass, SlotDefinition, SlotPlan, pack};
use pretty_assertions::assert_eq;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Captured {
    Span { name: String, target: String },
    Event { message: String, parent: Option<String> },
}

struct MessageVisitor(Option<String>);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

struct SpanCapture {
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.captured.lock().unwrap().push(Captured::Span {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        self.captured.lock().unwrap().push(Captured::Event {
            message: visitor.0.unwrap_or_default(),
            parent: ctx.event_span(event).map(|span| span.name().to_string()),
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(SpanCapture {
            captured: Arc::clone(&captured),
        });
    tracing::subscriber::with_default(subscriber, f);
    let out = captured.lock().unwrap().clone();
    out
}

fn pack_span() -> Captured {
    Captured::Span {
        name: "pack".into(),
        target: "offergrid.pack".into(),
    }
}

#[test]
fn pack_event_is_nested_in_pack_span() {
    let captured = with_capture(|| {
        pack(&SlotPlan::offers(), FlowDirection::Rtl).expect("offers plan packs");
    });
    assert_eq!(
        captured,
        vec![
            pack_span(),
            Captured::Event {
                message: "packed slot plan".into(),
                parent: Some("pack".into()),
            },
        ]
    );
}

#[test]
fn failed_pack_still_opens_span() {
    let plan = SlotPlan::new(
        1,
        None,
        vec![
            SlotDefinition::new(0, SizeClass::Small, 1, 1),
            SlotDefinition::new(1, SizeClass::Poster, 1, u16::MAX),
        ],
    )
    .expect("structurally valid");
    let captured = with_capture(|| {
        assert!(matches!(
            pack(&plan, FlowDirection::Ltr),
            Err(PackError::RowOverflow { .. })
        ));
    });
    assert_eq!(captured, vec![pack_span()]);
}
