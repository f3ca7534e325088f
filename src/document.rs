// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Minimal XML document model.
//!
//! A [`Document`] is the flat list of `quick-xml` events making up a
//! file, with each start tag linked to its end tag. Elements are
//! addressed by [`Element`] handles. Events which are never modified
//! are written back exactly as they were read, so a file can be
//! edited without reformatting the parts we do not touch.

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{RebrandError, Result};

/// Handle to an element in a [`Document`].
///
/// `start` and `end` are indices of the opening and closing events.
/// They are equal for empty elements such as `<ph name="X"/>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Element {
    start: usize,
    end: usize,
}

impl Element {
    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug)]
pub struct Document<'a> {
    events: Vec<Event<'a>>,
    // Maps the index of every start event to the index of its end event.
    ends: Vec<usize>,
    root: Element,
}

impl<'a> Document<'a> {
    /// Parse `content` into a document.
    ///
    /// Syntax errors, unclosed elements and documents without exactly
    /// one root element are reported as malformed.
    pub fn parse(content: &'a str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut events = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Eof => break,
                event => events.push(event),
            }
        }
        check_events(&events)?;
        let ends = match_ends(&events)?;
        let root = find_root(&events, &ends)?;
        Ok(Document { events, ends, root })
    }

    pub fn root(&self) -> Element {
        self.root
    }

    fn start_tag(&self, element: Element) -> &BytesStart<'a> {
        match &self.events[element.start] {
            Event::Start(start) | Event::Empty(start) => start,
            _ => unreachable!("element handles point at start tags"),
        }
    }

    /// The tag name of `element`.
    pub fn name(&self, element: Element) -> String {
        String::from_utf8_lossy(self.start_tag(element).name().as_ref()).into_owned()
    }

    pub fn is_named(&self, element: Element, name: &str) -> bool {
        self.start_tag(element).name().as_ref() == name.as_bytes()
    }

    /// The unescaped value of attribute `key`, if present.
    pub fn attribute(&self, element: Element, key: &str) -> Result<Option<String>> {
        match self.start_tag(element).try_get_attribute(key)? {
            Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
            None => Ok(None),
        }
    }

    /// Like [`Document::attribute`], but an absent or empty value is an
    /// error.
    pub fn required_attribute(&self, element: Element, key: &'static str) -> Result<String> {
        match self.attribute(element, key)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(RebrandError::MissingAttribute {
                element: self.name(element),
                attribute: key,
            }),
        }
    }

    /// Direct child elements of `parent`, in document order.
    pub fn children(&self, parent: Element) -> Vec<Element> {
        let mut children = Vec::new();
        let mut idx = parent.start + 1;
        while idx < parent.end {
            match &self.events[idx] {
                Event::Start(_) | Event::Empty(_) => {
                    let end = self.ends[idx];
                    children.push(Element { start: idx, end });
                    idx = end + 1;
                }
                _ => idx += 1,
            }
        }
        children
    }

    pub fn children_named(&self, parent: Element, name: &str) -> Vec<Element> {
        self.children(parent)
            .into_iter()
            .filter(|child| self.is_named(*child, name))
            .collect()
    }

    /// The first direct child of `parent` called `name`.
    pub fn child(&self, parent: Element, name: &str) -> Option<Element> {
        self.children(parent)
            .into_iter()
            .find(|child| self.is_named(*child, name))
    }

    /// Character data between the start tag and the first child.
    pub fn text(&self, element: Element) -> Result<String> {
        if element.is_empty() {
            return Ok(String::new());
        }
        self.character_data(element.start + 1)
    }

    /// Character data between the end tag and the next sibling (or the
    /// end of the parent).
    pub fn tail(&self, element: Element) -> Result<String> {
        self.character_data(element.end + 1)
    }

    // Comments and processing instructions do not interrupt the data.
    fn character_data(&self, from: usize) -> Result<String> {
        let mut data = String::new();
        for event in self.events.iter().skip(from) {
            match event {
                Event::Text(text) => data.push_str(&text.unescape()?),
                Event::CData(cdata) => data.push_str(
                    std::str::from_utf8(cdata)
                        .map_err(|err| RebrandError::Malformed(err.to_string()))?,
                ),
                Event::Comment(_) | Event::PI(_) => {}
                _ => break,
            }
        }
        Ok(data)
    }

    /// The raw markup between the start and end tag of `element`.
    pub fn inner_xml(&self, element: Element) -> Result<String> {
        if element.is_empty() {
            return Ok(String::new());
        }
        write_events(&self.events[element.start + 1..element.end])
    }

    /// Set attribute `key` of `element`, keeping the other attributes
    /// in place.
    pub fn set_attribute(&mut self, element: Element, key: &str, value: &str) -> Result<()> {
        let old = self.start_tag(element);
        let mut start = old.clone().into_owned();
        start.clear_attributes();
        let mut replaced = false;
        for attribute in old.attributes() {
            let attribute = attribute?;
            if attribute.key.as_ref() == key.as_bytes() {
                start.push_attribute((key, value));
                replaced = true;
            } else if attribute.value.contains(&b'"') {
                // Only single quoted values hold a raw `"`, and the tag is
                // written back with double quotes.
                let unescaped = attribute.unescape_value()?;
                start.push_attribute((attribute.key.as_ref(), escape(&unescaped).as_bytes()));
            } else {
                start.push_attribute(attribute);
            }
        }
        if !replaced {
            start.push_attribute((key, value));
        }

        self.events[element.start] = if element.is_empty() {
            Event::Empty(start)
        } else {
            Event::Start(start)
        };
        Ok(())
    }

    /// Replace the character data before the first child of `element`.
    ///
    /// Comments in the replaced region are kept. Events move around,
    /// so handles to elements after `element` are invalidated: apply
    /// several edits from the last element to the first.
    pub fn set_text(&mut self, element: Element, text: &str) -> Result<()> {
        let text = Event::Text(BytesText::from_escaped(partial_escape(text).into_owned()));
        if element.is_empty() {
            let start = self.start_tag(element).clone().into_owned();
            let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
            self.events.splice(
                element.start..=element.start,
                [Event::Start(start), text, Event::End(BytesEnd::new(name))],
            );
        } else {
            let first = element.start + 1;
            let mut last = first;
            let mut replacement = vec![text];
            while let Some(event) = self.events.get(last) {
                match event {
                    Event::Text(_) | Event::CData(_) => {}
                    Event::Comment(_) | Event::PI(_) => replacement.push(event.clone()),
                    _ => break,
                }
                last += 1;
            }
            self.events.splice(first..last, replacement);
        }

        self.ends = match_ends(&self.events)?;
        self.root = find_root(&self.events, &self.ends)?;
        Ok(())
    }

    /// Serialize the whole document, prolog included.
    pub fn to_xml(&self) -> Result<String> {
        write_events(&self.events)
    }

    /// Serialize the document with its prolog replaced by `preamble`.
    pub fn to_xml_with_preamble(&self, preamble: &str) -> Result<String> {
        let body = write_events(&self.events[self.root.start..])?;
        Ok(format!("{preamble}{body}"))
    }
}

fn write_events(events: &[Event]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    for event in events {
        writer.write_event(event.borrow())?;
    }
    String::from_utf8(writer.into_inner()).map_err(|err| RebrandError::Malformed(err.to_string()))
}

// quick-xml only decodes entities and attribute lists on demand, so
// check them all up front.
fn check_events(events: &[Event]) -> Result<()> {
    for event in events {
        match event {
            Event::Text(text) => {
                text.unescape()?;
            }
            Event::Start(start) | Event::Empty(start) => {
                for attribute in start.attributes() {
                    attribute?.unescape_value()?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn match_ends(events: &[Event]) -> Result<Vec<usize>> {
    let mut ends = (0..events.len()).collect::<Vec<_>>();
    let mut open = Vec::new();
    for (idx, event) in events.iter().enumerate() {
        match event {
            Event::Start(_) => open.push(idx),
            Event::End(end) => {
                let start = open.pop().ok_or_else(|| {
                    RebrandError::Malformed(format!(
                        "unexpected </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                ends[start] = idx;
            }
            _ => {}
        }
    }

    match open.last().map(|&idx| &events[idx]) {
        Some(Event::Start(start)) => Err(RebrandError::Malformed(format!(
            "unclosed element <{}>",
            String::from_utf8_lossy(start.name().as_ref())
        ))),
        _ => Ok(ends),
    }
}

fn find_root(events: &[Event], ends: &[usize]) -> Result<Element> {
    let mut roots = Vec::new();
    let mut idx = 0;
    while idx < events.len() {
        match &events[idx] {
            Event::Start(_) | Event::Empty(_) => {
                roots.push(Element {
                    start: idx,
                    end: ends[idx],
                });
                idx = ends[idx] + 1;
            }
            _ => idx += 1,
        }
    }

    match roots.as_slice() {
        [root] => Ok(*root),
        [] => Err(RebrandError::Malformed(String::from(
            "document has no root element",
        ))),
        _ => Err(RebrandError::Malformed(String::from(
            "document has more than one root element",
        ))),
    }
}
