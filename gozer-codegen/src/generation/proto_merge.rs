//! Structural merge of proto descriptors.
//!
//! A descriptor is split into a header, top-level `message`/`enum` blocks
//! keyed by name, and the rpcs of its `service` keyed by rpc name. Merging
//! works on those keys, never on raw text.

use indexmap::IndexMap;

/// One rpc declaration with the comment lines directly above it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rpc {
    comments: Vec<String>,
    line: String,
}

/// A parsed `.proto` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoDescriptor {
    header: Vec<String>,
    /// Block name -> block lines (comments above it included).
    messages: IndexMap<String, Vec<String>>,
    service: Option<String>,
    rpcs: IndexMap<String, Rpc>,
}

impl ProtoDescriptor {
    pub fn parse(text: &str) -> Self {
        let mut descriptor = Self::default();
        let mut pending: Vec<String> = Vec::new();
        let mut lines = text.lines().map(str::trim_end);
        let mut seen_block = false;

        while let Some(line) = lines.next() {
            let trimmed = line.trim();

            if let Some(name) = block_name(trimmed, "service") {
                seen_block = true;
                descriptor.service = Some(name.to_string());
                pending.clear();
                descriptor.parse_service_body(&mut lines, brace_delta(trimmed));
                continue;
            }

            if let Some(name) =
                block_name(trimmed, "message").or_else(|| block_name(trimmed, "enum"))
            {
                if !seen_block {
                    descriptor.take_header_comments(&mut pending);
                }
                seen_block = true;
                let mut block = std::mem::take(&mut pending);
                block.push(line.to_string());
                let mut depth = brace_delta(trimmed);
                while depth > 0 {
                    let Some(inner) = lines.next() else { break };
                    depth += brace_delta(inner);
                    block.push(inner.to_string());
                }
                descriptor.messages.entry(name.to_string()).or_insert(block);
                continue;
            }

            if !seen_block {
                descriptor.header.push(line.to_string());
            } else if trimmed.starts_with("//") {
                pending.push(line.to_string());
            } else if trimmed.is_empty() {
                pending.clear();
            } else {
                // stray top-level statement after the first block
                descriptor.header.push(line.to_string());
            }
        }

        while descriptor.header.last().is_some_and(|l| l.is_empty()) {
            descriptor.header.pop();
        }
        descriptor
    }

    /// Move the comment lines ending the header into `pending`.
    fn take_header_comments(&mut self, pending: &mut Vec<String>) {
        let start = self
            .header
            .iter()
            .rposition(|l| !l.trim().starts_with("//"))
            .map_or(0, |i| i + 1);
        pending.splice(0..0, self.header.drain(start..));
    }

    fn parse_service_body<'a>(
        &mut self,
        lines: &mut impl Iterator<Item = &'a str>,
        mut depth: i32,
    ) {
        let mut comments = Vec::new();
        while depth > 0 {
            let Some(line) = lines.next() else { break };
            depth += brace_delta(line);
            let trimmed = line.trim();
            if depth <= 0 && trimmed.starts_with('}') {
                break;
            }
            if trimmed.starts_with("//") {
                comments.push(trimmed.to_string());
            } else if let Some(name) = rpc_name(trimmed) {
                self.rpcs.entry(name.to_string()).or_insert(Rpc {
                    comments: std::mem::take(&mut comments),
                    line: trimmed.to_string(),
                });
            } else if trimmed.is_empty() {
                comments.clear();
            }
        }
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Merge `other` into `self`.
    ///
    /// Messages and rpcs missing from `self` are appended. Existing ones are
    /// kept unless `replace` is set, in which case `other`'s version wins
    /// while keeping its original position.
    pub fn merge(&mut self, other: ProtoDescriptor, replace: bool) {
        if self.header.is_empty() {
            self.header = other.header;
        }
        if self.service.is_none() {
            self.service = other.service;
        }
        for (name, block) in other.messages {
            match self.messages.get_mut(&name) {
                Some(existing) if replace => *existing = block,
                Some(_) => {}
                None => {
                    self.messages.insert(name, block);
                }
            }
        }
        for (name, rpc) in other.rpcs {
            match self.rpcs.get_mut(&name) {
                Some(existing) if replace => *existing = rpc,
                Some(_) => {}
                None => {
                    self.rpcs.insert(name, rpc);
                }
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for block in self.messages.values() {
            if !out.is_empty() {
                out.push('\n');
            }
            for line in block {
                out.push_str(line);
                out.push('\n');
            }
        }
        if let Some(service) = &self.service {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("service {} {{\n", service));
            for (index, rpc) in self.rpcs.values().enumerate() {
                if index > 0 && !rpc.comments.is_empty() {
                    out.push('\n');
                }
                for comment in &rpc.comments {
                    out.push_str(&format!("  {}\n", comment));
                }
                out.push_str(&format!("  {}\n", rpc.line));
            }
            out.push_str("}\n");
        }
        out
    }
}

/// Name of a top-level block opened by `keyword`, e.g. `message UserInfo {`.
fn block_name<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if !rest.starts_with(char::is_whitespace) || !rest.contains('{') {
        return None;
    }
    let name = rest
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '{')
        .next()?;
    (!name.is_empty()).then_some(name)
}

fn rpc_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("rpc")?.trim_start();
    let end = rest.find(|c: char| c == '(' || c.is_whitespace())?;
    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Net braces opened on a line, ignoring `//` comments.
fn brace_delta(line: &str) -> i32 {
    let code = line.split("//").next().unwrap_or(line);
    code.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}
