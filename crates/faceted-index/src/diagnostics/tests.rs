use super::*;
use std::cell::RefCell;

struct CapturingSink {
    captured: RefCell<Vec<Warning>>,
}

impl WarningSink for CapturingSink {
    fn record(&self, warning: Warning) {
        self.captured.borrow_mut().push(warning);
    }
}

#[test]
fn with_warning_sink_captures_and_restores() {
    let sink = CapturingSink {
        captured: RefCell::new(Vec::new()),
    };

    with_warning_sink(&sink, || {
        warn(Warning::AliasProducedNoPairs {
            field: "zname".to_owned(),
        });
    });

    assert_eq!(sink.captured.borrow().len(), 1);

    // After the scope exits, warnings no longer reach this sink.
    warn(Warning::AliasProducedNoPairs {
        field: "other".to_owned(),
    });
    assert_eq!(sink.captured.borrow().len(), 1);
}

#[test]
fn warning_display_names_the_field() {
    let w = Warning::AliasValueUnresolved {
        field: "zname".to_owned(),
        value: "Unknown".to_owned(),
    };
    assert!(w.to_string().contains("zname"));
    assert!(w.to_string().contains("Unknown"));
}
