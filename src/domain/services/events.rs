#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use std::collections::VecDeque;

use anyhow::Result;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::io::Stdin;
use tokio::sync::mpsc;

use crate::domain::models::Event;
use crate::domain::models::SlashCommand;

/// Merges typed commands with timer events into a single queue, so the
/// controller only ever sees one event at a time.
pub struct EventsService<R: AsyncBufRead + Unpin> {
    input: Lines<R>,
    input_closed: bool,
    events: mpsc::UnboundedReceiver<Event>,
    pending: VecDeque<Event>,
}

impl EventsService<BufReader<Stdin>> {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService<BufReader<Stdin>> {
        return EventsService::with_input(BufReader::new(tokio::io::stdin()), events);
    }
}

impl<R: AsyncBufRead + Unpin> EventsService<R> {
    pub fn with_input(input: R, events: mpsc::UnboundedReceiver<Event>) -> EventsService<R> {
        return EventsService {
            input: input.lines(),
            input_closed: false,
            events,
            pending: VecDeque::new(),
        };
    }

    fn handle_line(line: &str) -> Vec<Event> {
        if line.trim().is_empty() {
            return vec![];
        }

        if let Some(events) = SlashCommand::parse(line).and_then(|cmd| return cmd.events()) {
            return events;
        }

        tracing::debug!(line, "unrecognised input");
        return vec![Event::Help()];
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => return Ok(event),
                    None => return Ok(Event::Quit()),
                },
                line = self.input.next_line(), if !self.input_closed => match line? {
                    Some(line) => self.pending.extend(Self::handle_line(&line)),
                    None => {
                        self.input_closed = true;
                        self.pending.push_back(Event::Quit());
                    }
                },
            }
        }
    }
}
