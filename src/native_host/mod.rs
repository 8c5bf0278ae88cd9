//! Chrome native messaging endpoint for the DeepFocus extension.
//!
//! Each message is a 4-byte little-endian length followed by that many bytes
//! of UTF-8 JSON, in both directions. Every request gets exactly one reply.

mod messages;

pub use messages::{IncomingMessage, OutgoingMessage, ACTIONS};

use crate::backup;
use crate::blocked_page::BlockedPageView;
use crate::blocker::Blocker;
use crate::clock::Clock;
use crate::constants::{MAX_MESSAGE_SIZE, STAT_SITES_BLOCKED, STAT_SITES_UNBLOCKED};
use crate::error::{AppError, AppResult, ErrorKind};
use crate::models::{extract_host, AddOutcome, BlockList, ScheduleConfig, Stats};
use crate::notice::{NoticeBoard, NoticeKind};
use crate::store::Store;
use crate::validation::normalize_domain;
use log::{error, info, warn};
use std::io::{self, Read, Write};
use std::sync::Arc;

pub struct NativeHost {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    blocker: Blocker,
    notices: NoticeBoard,
}

impl NativeHost {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        let blocker = Blocker::new(Arc::clone(&store), Arc::clone(&clock));
        let notices = NoticeBoard::new(Arc::clone(&clock));
        Self {
            store,
            clock,
            blocker,
            notices,
        }
    }

    /// Serve requests until the extension closes the pipe.
    pub fn run<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> io::Result<()> {
        // EOF at a frame boundary is Chrome closing the connection
        while let Some(frame) = read_frame(reader)? {
            let response = self.handle_raw(&frame);
            write_frame(writer, &response)?;
        }
        Ok(())
    }

    /// Decode one JSON request and handle it.
    pub fn handle_raw(&self, bytes: &[u8]) -> OutgoingMessage {
        let value: serde_json::Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!("Malformed message: {e}");
                return OutgoingMessage::error(format!("Invalid message: {e}"));
            }
        };

        let action = value.get("action").and_then(serde_json::Value::as_str);
        if !action.is_some_and(|action| ACTIONS.contains(&action)) {
            warn!("Unrecognized action: {action:?}");
            return OutgoingMessage::error("Unrecognized action");
        }

        match serde_json::from_value::<IncomingMessage>(value) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                warn!("Malformed message: {e}");
                OutgoingMessage::error(format!("Invalid message: {e}"))
            }
        }
    }

    pub fn handle_message(&self, message: IncomingMessage) -> OutgoingMessage {
        let result = match message {
            IncomingMessage::GetStats => Ok(OutgoingMessage::Stats(self.get_stats())),
            IncomingMessage::UpdateStats { key, increment } => self
                .store
                .increment_stat(&key, increment, self.clock.now())
                .map(|_| OutgoingMessage::success()),
            IncomingMessage::CheckBlockedSites => {
                Ok(OutgoingMessage::Sites(self.get_block_list().into_domains()))
            }
            IncomingMessage::EvaluateNavigation(event) => Ok(OutgoingMessage::Navigation {
                decision: self.blocker.evaluate_navigation(&event),
                tab_id: event.tab_id,
            }),
            IncomingMessage::CheckSite { url } => self.check_site(&url),
            IncomingMessage::AddSite { domain } => self.add_site(&domain),
            IncomingMessage::BlockCurrentSite { url } => self.block_current_site(&url),
            IncomingMessage::RemoveSite { domain } => self.remove_site(&domain),
            IncomingMessage::ClearSites => self.clear_sites(),
            IncomingMessage::GetSchedule => Ok(OutgoingMessage::Schedule(self.get_schedule())),
            IncomingMessage::SetSchedule { schedule } => self.set_schedule(&schedule),
            IncomingMessage::GetSettings => self.store.get_settings().map(OutgoingMessage::Settings),
            IncomingMessage::SetSettings { settings } => self
                .store
                .set_settings(&settings)
                .map(|()| OutgoingMessage::success()),
            IncomingMessage::ExportData => self.export_data(),
            IncomingMessage::ImportData { data } => self.import_data(&data),
            IncomingMessage::ResetData => self.reset_data(),
            IncomingMessage::GetBlockedPage => Ok(OutgoingMessage::BlockedPage(BlockedPageView::new(
                &self.get_stats(),
                self.clock.now(),
            ))),
            IncomingMessage::GetNotices => Ok(OutgoingMessage::Notices(self.notices.active())),
            IncomingMessage::DismissNotice { id } => Ok(OutgoingMessage::Dismissed {
                dismissed: self.notices.dismiss(id),
            }),
        };

        result.unwrap_or_else(|e| {
            match e.kind() {
                ErrorKind::Storage => error!("Request failed: {e}"),
                ErrorKind::Config | ErrorKind::Parse => warn!("Request rejected: {e}"),
            }
            OutgoingMessage::error(e.to_string())
        })
    }

    fn get_stats(&self) -> Stats {
        self.store.get_stats().unwrap_or_else(|e| {
            error!("Failed to load stats: {e}");
            Stats::default()
        })
    }

    fn get_block_list(&self) -> BlockList {
        self.store.get_block_list().unwrap_or_else(|e| {
            error!("Failed to load blocked sites: {e}");
            BlockList::new()
        })
    }

    fn get_schedule(&self) -> ScheduleConfig {
        self.store.get_schedule().unwrap_or_else(|e| {
            error!("Failed to load blocking schedule: {e}");
            ScheduleConfig::default()
        })
    }

    /// Post an error notice for a failed user action and pass the error on.
    fn notify_failure(&self, e: AppError) -> AppError {
        self.notices.post(NoticeKind::Error, e.to_string());
        e
    }

    fn check_site(&self, url: &str) -> AppResult<OutgoingMessage> {
        let domain = extract_host(url)?;
        let blocked = self.blocker.is_site_blocked(&domain);
        Ok(OutgoingMessage::SiteStatus { domain, blocked })
    }

    fn add_site(&self, input: &str) -> AppResult<OutgoingMessage> {
        let domain = normalize_domain(input).map_err(|e| self.notify_failure(e))?;
        self.insert_site(domain)
    }

    fn block_current_site(&self, url: &str) -> AppResult<OutgoingMessage> {
        let domain = extract_host(url).map_err(|e| {
            self.notify_failure(AppError::InvalidDomain {
                reason: format!("This site cannot be blocked: {e}"),
            })
        })?;
        self.insert_site(domain)
    }

    fn insert_site(&self, domain: String) -> AppResult<OutgoingMessage> {
        let outcome = self.store.add_site(&domain).map_err(|e| self.notify_failure(e))?;

        let changed = match outcome {
            AddOutcome::Added => {
                info!("Blocked {domain}");
                if let Err(e) = self.store.increment_stat(STAT_SITES_BLOCKED, 1, self.clock.now()) {
                    warn!("Failed to count blocked site: {e}");
                }
                self.notices
                    .post(NoticeKind::Success, format!("Site \"{domain}\" added to the block-list"));
                true
            }
            AddOutcome::AlreadyPresent => {
                self.notices
                    .post(NoticeKind::Info, format!("Site \"{domain}\" is already in the block-list"));
                false
            }
        };

        Ok(OutgoingMessage::SiteUpdated {
            success: true,
            domain,
            changed,
        })
    }

    fn remove_site(&self, input: &str) -> AppResult<OutgoingMessage> {
        let domain = input.trim().to_lowercase();
        let removed = self.store.remove_site(&domain).map_err(|e| self.notify_failure(e))?;

        if removed {
            info!("Unblocked {domain}");
            if let Err(e) = self.store.increment_stat(STAT_SITES_UNBLOCKED, 1, self.clock.now()) {
                warn!("Failed to count unblocked site: {e}");
            }
            self.notices
                .post(NoticeKind::Success, format!("Site \"{domain}\" removed from the block-list"));
        }

        Ok(OutgoingMessage::SiteUpdated {
            success: true,
            domain,
            changed: removed,
        })
    }

    fn clear_sites(&self) -> AppResult<OutgoingMessage> {
        self.store
            .set_block_list(&BlockList::new())
            .map_err(|e| self.notify_failure(e))?;
        self.notices.post(NoticeKind::Success, "All sites have been removed");
        Ok(OutgoingMessage::success())
    }

    fn set_schedule(&self, schedule: &ScheduleConfig) -> AppResult<OutgoingMessage> {
        schedule.validate().map_err(|e| self.notify_failure(e))?;
        self.store.set_schedule(schedule).map_err(|e| self.notify_failure(e))?;
        info!("Blocking schedule updated (enabled: {})", schedule.enabled);
        Ok(OutgoingMessage::success())
    }

    fn export_data(&self) -> AppResult<OutgoingMessage> {
        let snapshot = backup::export(self.store.as_ref(), self.clock.now()).map_err(|e| self.notify_failure(e))?;
        self.notices.post(NoticeKind::Success, "Data exported");
        let contents = snapshot.to_pretty_json().map_err(|e| self.notify_failure(e))?;
        Ok(OutgoingMessage::Export {
            file_name: snapshot.file_name(),
            contents,
            snapshot,
        })
    }

    fn import_data(&self, data: &serde_json::Value) -> AppResult<OutgoingMessage> {
        let summary = backup::import_payload(self.store.as_ref(), data).map_err(|e| self.notify_failure(e))?;
        self.notices.post(NoticeKind::Success, "Data imported");
        Ok(OutgoingMessage::Imported(summary))
    }

    fn reset_data(&self) -> AppResult<OutgoingMessage> {
        backup::reset(self.store.as_ref()).map_err(|e| self.notify_failure(e))?;
        self.notices.post(NoticeKind::Success, "All data has been reset");
        Ok(OutgoingMessage::success())
    }
}

/// Read one frame. `None` means the peer closed the pipe between frames.
fn read_frame<R: Read>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    // Chrome Native Messaging protocol specifies little-endian byte order
    let mut len_bytes = [0u8; 4];
    let mut filled = 0;
    while let Some(rest) = len_bytes.get_mut(filled..).filter(|rest| !rest.is_empty()) {
        match reader.read(rest) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("Connection closed inside a length prefix ({filled} of 4 bytes)"),
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    let len = usize::try_from(u32::from_le_bytes(len_bytes))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Message too large: {len} bytes (max: {MAX_MESSAGE_SIZE} bytes)"),
        ));
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer)?;
    Ok(Some(buffer))
}

fn write_frame<W: Write>(writer: &mut W, message: &OutgoingMessage) -> io::Result<()> {
    let json = serde_json::to_vec(message)?;
    let len = u32::try_from(json.len()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    // Chrome Native Messaging protocol specifies little-endian byte order
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()?;

    Ok(())
}
