// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use std::ops::Range;

use markdown_mdast_compiler::Event;
use markdown_mdast_compiler::events::EventBuilder;

enum Op {
    Enter(&'static str, Range<usize>),
    Exit,
}

/// Synthetic markdown together with the events a tokenizer would emit for it.
pub struct Document {
    pub source: String,
    ops: Vec<Op>,
}

impl Document {
    #[allow(dead_code)]
    pub fn events(&self) -> Vec<Event> {
        let mut builder = EventBuilder::new(&self.source);
        for op in &self.ops {
            builder = match op {
                Op::Enter(kind, range) => builder.enter(*kind, range.clone()),
                Op::Exit => builder.exit(),
            };
        }
        builder.build().expect("generated events are balanced")
    }
}

#[derive(Default)]
struct Writer {
    source: String,
    ops: Vec<Op>,
    open: Vec<usize>,
}

impl Writer {
    fn open(&mut self, kind: &'static str) {
        let start = self.source.len();
        self.open.push(self.ops.len());
        self.ops.push(Op::Enter(kind, start..start));
    }

    fn close(&mut self) {
        let end = self.source.len();
        if let Some(Op::Enter(_, range)) = self.open.pop().and_then(|index| self.ops.get_mut(index))
        {
            range.end = end;
        }
        self.ops.push(Op::Exit);
    }

    fn leaf(&mut self, kind: &'static str, text: &str) {
        self.open(kind);
        self.source.push_str(text);
        self.close();
    }

    fn blank_line(&mut self) {
        self.leaf("lineEnding", "\n");
        self.leaf("lineEndingBlank", "\n");
    }

    fn heading(&mut self, section: usize) {
        self.open("atxHeading");
        self.leaf("atxHeadingSequence", "#");
        self.leaf("whitespace", " ");
        self.open("atxHeadingText");
        self.leaf("data", &format!("Section {section}"));
        self.close();
        self.close();
        self.blank_line();
    }

    fn paragraph(&mut self) {
        self.open("paragraph");
        self.leaf("data", "Some text with ");
        self.open("emphasis");
        self.leaf("emphasisSequence", "*");
        self.open("emphasisText");
        self.leaf("data", "emphasis");
        self.close();
        self.leaf("emphasisSequence", "*");
        self.close();
        self.leaf("data", " and a ");
        self.open("codeText");
        self.leaf("codeTextSequence", "`");
        self.leaf("codeTextData", "span");
        self.leaf("codeTextSequence", "`");
        self.close();
        self.leaf("data", ".");
        self.leaf("lineEnding", "\n");
        self.leaf("data", "Second line &amp; more.");
        self.close();
        self.blank_line();
    }

    fn list(&mut self, items: usize) {
        self.open("listUnordered");
        for item in 0..items {
            self.open("listItemPrefix");
            self.leaf("listItemMarker", "-");
            self.leaf("listItemPrefixWhitespace", " ");
            self.close();
            self.open("paragraph");
            self.leaf("data", &format!("Item {item}"));
            self.close();
            if item + 1 < items {
                self.leaf("lineEnding", "\n");
            }
        }
        self.close();
        self.blank_line();
    }
}

#[allow(dead_code)]
pub fn generate_document(sections: usize, items: usize) -> Document {
    let mut writer = Writer::default();
    for section in 0..sections {
        writer.heading(section);
        writer.paragraph();
        writer.list(items);
    }

    Document {
        source: writer.source,
        ops: writer.ops,
    }
}
