use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};

use super::{
    render_text_document, CaptureOutcome, CaptureSettings, ChatEvent, ChatPlatform, ContentKind,
};
use crate::documents::LocalDocumentStore;
use crate::errors::{Error, Result};
use crate::remote::{CommitOutcome, RemoteStore};
use crate::sessions::{ChatId, SessionStore};
use crate::users::UserDirectory;
use crate::utils::filename_utils::{remote_basename, resolve_relative_path, sanitize_filename};

/// Names a photo in failure notices before its filename is known.
const PHOTO_LABEL: &str = "image";

/// Handles one inbound chat event at a time: resolve the filename, write the
/// local copy, commit it remotely, and acknowledge in the chat.
pub struct CaptureService {
    sessions: Arc<dyn SessionStore>,
    remote: Arc<dyn RemoteStore>,
    chat: Arc<dyn ChatPlatform>,
    documents: LocalDocumentStore,
    users: Arc<UserDirectory>,
    settings: CaptureSettings,
}

impl CaptureService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        remote: Arc<dyn RemoteStore>,
        chat: Arc<dyn ChatPlatform>,
        documents: LocalDocumentStore,
        users: Arc<UserDirectory>,
        settings: CaptureSettings,
    ) -> Self {
        Self {
            sessions,
            remote,
            chat,
            documents,
            users,
            settings,
        }
    }

    pub fn documents(&self) -> &LocalDocumentStore {
        &self.documents
    }

    /// Processes `event`.
    ///
    /// Save failures are reported to the chat on a best-effort basis before the
    /// error is returned. A failed acknowledgment after a successful save is
    /// only logged.
    pub async fn handle(&self, event: ChatEvent) -> Result<CaptureOutcome> {
        match event {
            ChatEvent::Directive { chat_id, raw_name } => {
                self.set_filename(chat_id, &raw_name).await
            }
            ChatEvent::Text { chat_id, text } => self.capture_text(chat_id, &text).await,
            ChatEvent::Photo { chat_id, file_id } => self.capture_photo(chat_id, &file_id).await,
            ChatEvent::Ignored => Ok(CaptureOutcome::Ignored),
        }
    }

    async fn set_filename(&self, chat_id: ChatId, raw_name: &str) -> Result<CaptureOutcome> {
        let filename = sanitize_filename(raw_name);
        if filename.is_empty() {
            warn!("Chat {} sent an unusable filename {:?}", chat_id, raw_name);
            self.acknowledge(
                chat_id,
                "⚠️ That name has no usable characters. Use letters, digits, '-', '_', '.' or '/'.",
            )
            .await;
            return Ok(CaptureOutcome::FilenameRejected);
        }
        if let Err(err) = resolve_relative_path(self.documents.root(), &filename) {
            warn!("Chat {} sent a disallowed filename {:?}: {}", chat_id, raw_name, err);
            self.acknowledge(
                chat_id,
                &format!(
                    "⚠️ `{}` can't be used: names may not start with '.' or contain '..' segments.",
                    filename
                ),
            )
            .await;
            return Ok(CaptureOutcome::FilenameRejected);
        }

        self.sessions.set(chat_id, &filename).await?;
        info!("Chat {} set filename {}", chat_id, filename);
        self.acknowledge(chat_id, &format!("✅ Filename set: {}", filename))
            .await;
        Ok(CaptureOutcome::FilenameSet { filename })
    }

    async fn capture_text(&self, chat_id: ChatId, text: &str) -> Result<CaptureOutcome> {
        let fallback = sanitize_filename(&self.settings.default_text_filename);
        let filename = match self.declared_filename(chat_id).await {
            Ok(declared) => declared.unwrap_or(fallback),
            Err(err) => return Err(self.report_failure(chat_id, &fallback, err).await),
        };
        let author = self.users.display_name_for_chat(chat_id);
        let now = Utc::now().with_timezone(&self.settings.timezone);

        let saved: Result<CommitOutcome> = async {
            let document = render_text_document(text, &filename, &author, now)?;
            self.store(&filename, document.as_bytes()).await
        }
        .await;
        let commit = match saved {
            Ok(commit) => commit,
            Err(err) => return Err(self.report_failure(chat_id, &filename, err).await),
        };

        self.acknowledge(chat_id, &format!("✅ Scroll saved as `{}`", filename))
            .await;
        Ok(CaptureOutcome::Saved {
            filename,
            kind: ContentKind::Text,
            commit,
        })
    }

    async fn capture_photo(&self, chat_id: ChatId, file_id: &str) -> Result<CaptureOutcome> {
        let declared = match self.declared_filename(chat_id).await {
            Ok(declared) => declared,
            Err(err) => return Err(self.report_failure(chat_id, PHOTO_LABEL, err).await),
        };
        let label = declared.as_deref().unwrap_or(PHOTO_LABEL).to_string();

        let saved: Result<(String, CommitOutcome)> = async {
            let fetched = self.chat.fetch_file(file_id).await?;
            let filename = match declared {
                Some(name) => name,
                None => sanitize_filename(remote_basename(&fetched.remote_path)),
            };
            if filename.is_empty() {
                return Err(Error::Validation(format!(
                    "No usable filename for {}",
                    fetched.remote_path
                )));
            }
            let commit = self.store(&filename, &fetched.bytes).await?;
            Ok((filename, commit))
        }
        .await;
        let (filename, commit) = match saved {
            Ok(saved) => saved,
            Err(err) => return Err(self.report_failure(chat_id, &label, err).await),
        };

        self.acknowledge(chat_id, &format!("🖼️ Image saved as `{}`", filename))
            .await;
        Ok(CaptureOutcome::Saved {
            filename,
            kind: ContentKind::Photo,
            commit,
        })
    }

    /// Filename declared by the chat's last directive, sanitized.
    async fn declared_filename(&self, chat_id: ChatId) -> Result<Option<String>> {
        let declared = self
            .sessions
            .get(chat_id)
            .await?
            .map(|name| sanitize_filename(&name))
            .filter(|name| !name.is_empty());
        debug!("Declared filename for chat {}: {:?}", chat_id, declared);
        Ok(declared)
    }

    async fn store(&self, filename: &str, content: &[u8]) -> Result<CommitOutcome> {
        let local_path = self.documents.write(filename, content).await?;
        debug!("Local copy at {}", local_path.display());
        let message = format!("Save {} from chat", filename);
        let commit = self.remote.commit(filename, content, &message).await?;
        info!(
            "Committed {} (content {}, commit {})",
            commit.path, commit.content_revision, commit.commit_revision
        );
        Ok(commit)
    }

    async fn acknowledge(&self, chat_id: ChatId, text: &str) {
        if let Err(err) = self.chat.send_message(chat_id, text).await {
            warn!("Failed to send acknowledgment to chat {}: {}", chat_id, err);
        }
    }

    async fn report_failure(&self, chat_id: ChatId, target: &str, err: Error) -> Error {
        error!("Capture of {} failed for chat {}: {}", target, chat_id, err);
        let notice = format!("❌ Could not save {}: {}", target, err);
        if let Err(send_err) = self.chat.send_message(chat_id, &notice).await {
            warn!(
                "Failed to report capture failure to chat {}: {}",
                chat_id, send_err
            );
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{FetchedFile, Frontmatter};
    use crate::remote::RemoteFile;
    use crate::sessions::InMemorySessionStore;
    use crate::users::UserAccount;
    use crate::utils::time_utils::{today_in, DEFAULT_REFERENCE_TZ};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // =========================================================================
    // Mocks
    // =========================================================================

    #[derive(Default)]
    struct MockRemote {
        commits: Mutex<Vec<(String, Vec<u8>, String)>>,
        fail_with: Mutex<Option<u16>>,
    }

    #[async_trait]
    impl RemoteStore for MockRemote {
        async fn commit(&self, path: &str, content: &[u8], message: &str) -> Result<CommitOutcome> {
            if let Some(status) = *self.fail_with.lock().unwrap() {
                return Err(Error::remote_sync(status, "rejected"));
            }
            self.commits
                .lock()
                .unwrap()
                .push((path.to_string(), content.to_vec(), message.to_string()));
            Ok(CommitOutcome {
                path: path.to_string(),
                content_revision: "blob-sha".into(),
                commit_revision: "commit-sha".into(),
            })
        }

        async fn read(&self, path: &str) -> Result<RemoteFile> {
            Err(Error::NotFound(path.to_string()))
        }
    }

    #[derive(Default)]
    struct MockChat {
        sent: Mutex<Vec<(ChatId, String)>>,
        file: Mutex<Option<FetchedFile>>,
        offline: Mutex<bool>,
    }

    impl MockChat {
        fn messages(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
        }
    }

    #[async_trait]
    impl ChatPlatform for MockChat {
        async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<()> {
            if *self.offline.lock().unwrap() {
                return Err(Error::Chat("chat unreachable".into()));
            }
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }

        async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile> {
            self.file
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| Error::Chat(format!("unknown file {}", file_id)))
        }
    }

    struct Harness {
        service: CaptureService,
        remote: Arc<MockRemote>,
        chat: Arc<MockChat>,
        _tmp: tempfile::TempDir,
    }

    fn harness() -> Harness {
        let tmp = tempdir().unwrap();
        let remote = Arc::new(MockRemote::default());
        let chat = Arc::new(MockChat::default());
        let users = UserDirectory::new(vec![UserAccount {
            name: "Adge".into(),
            api_key: "k".into(),
            epoch_date: NaiveDate::from_ymd_opt(2024, 3, 21).unwrap(),
            chat_ids: vec![ChatId(7)],
        }]);
        let service = CaptureService::new(
            Arc::new(InMemorySessionStore::new()),
            remote.clone(),
            chat.clone(),
            LocalDocumentStore::new(tmp.path()),
            Arc::new(users),
            CaptureSettings::default(),
        );
        Harness {
            service,
            remote,
            chat,
            _tmp: tmp,
        }
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[tokio::test]
    async fn save_as_then_text_creates_annotated_document() {
        let h = harness();
        let today = today_in(DEFAULT_REFERENCE_TZ);

        let outcome = h
            .service
            .handle(ChatEvent::from_text(ChatId(7), "Save As: My Notes"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CaptureOutcome::FilenameSet {
                filename: "My_Notes".into()
            }
        );

        let outcome = h
            .service
            .handle(ChatEvent::from_text(ChatId(7), "Hello world"))
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            CaptureOutcome::Saved { ref filename, kind: ContentKind::Text, .. } if filename == "My_Notes"
        ));

        let stored = h.service.documents().read_text("My_Notes").await.unwrap();
        let yaml = stored
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("---\n\n"))
            .map(|(yaml, body)| {
                assert_eq!(body, "Hello world");
                yaml.to_string()
            })
            .unwrap();
        let fm: Frontmatter = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(fm.title, "My_Notes");
        assert_eq!(fm.author, "Adge");
        // tolerate a midnight rollover between computing `today` and capturing
        assert!(fm.date == today.to_string() || fm.date == today_in(DEFAULT_REFERENCE_TZ).to_string());

        let commits = h.remote.commits.lock().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].0, "My_Notes");
        assert_eq!(commits[0].1, stored.as_bytes());

        assert_eq!(
            h.chat.messages(),
            vec![
                "✅ Filename set: My_Notes".to_string(),
                "✅ Scroll saved as `My_Notes`".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn text_without_directive_uses_default_name_and_unknown_author() {
        let h = harness();
        h.service
            .handle(ChatEvent::from_text(ChatId(99), "loose thought"))
            .await
            .unwrap();

        let stored = h.service.documents().read_text("scroll.md").await.unwrap();
        assert!(stored.contains("title: scroll.md"));
        assert!(stored.contains("author: Unknown"));
        assert_eq!(h.remote.commits.lock().unwrap()[0].0, "scroll.md");
    }

    #[tokio::test]
    async fn text_with_own_frontmatter_is_stored_verbatim() {
        let h = harness();
        let text = "---\ntitle: custom\n---\nbody";
        h.service
            .handle(ChatEvent::from_text(ChatId(7), text))
            .await
            .unwrap();
        assert_eq!(h.service.documents().read_text("scroll.md").await.unwrap(), text);
    }

    #[tokio::test]
    async fn photo_without_directive_uses_remote_basename() {
        let h = harness();
        *h.chat.file.lock().unwrap() = Some(FetchedFile {
            remote_path: "photos/file_12.jpg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0x00],
        });

        let outcome = h
            .service
            .handle(ChatEvent::Photo {
                chat_id: ChatId(7),
                file_id: "AgAD".into(),
            })
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            CaptureOutcome::Saved { ref filename, kind: ContentKind::Photo, .. } if filename == "file_12.jpg"
        ));

        let written = std::fs::read(h.service.documents().root().join("file_12.jpg")).unwrap();
        assert_eq!(written, vec![0xFF, 0xD8, 0xFF, 0x00]);
        assert_eq!(h.remote.commits.lock().unwrap()[0].1, written);
        assert_eq!(h.chat.messages(), vec!["🖼️ Image saved as `file_12.jpg`".to_string()]);
    }

    #[tokio::test]
    async fn photo_after_directive_uses_declared_name() {
        let h = harness();
        *h.chat.file.lock().unwrap() = Some(FetchedFile {
            remote_path: "photos/file_1.jpg".into(),
            bytes: vec![1, 2, 3],
        });
        h.service
            .handle(ChatEvent::from_text(ChatId(7), "save as: art/sunset.jpg"))
            .await
            .unwrap();
        h.service
            .handle(ChatEvent::Photo {
                chat_id: ChatId(7),
                file_id: "x".into(),
            })
            .await
            .unwrap();
        assert_eq!(h.remote.commits.lock().unwrap()[0].0, "art/sunset.jpg");
    }

    #[tokio::test]
    async fn unusable_directive_name_keeps_previous_session() {
        let h = harness();
        h.service
            .handle(ChatEvent::from_text(ChatId(7), "save as: keep.md"))
            .await
            .unwrap();
        let outcome = h
            .service
            .handle(ChatEvent::from_text(ChatId(7), "save as: ???"))
            .await
            .unwrap();
        assert_eq!(outcome, CaptureOutcome::FilenameRejected);

        h.service
            .handle(ChatEvent::from_text(ChatId(7), "text"))
            .await
            .unwrap();
        assert_eq!(h.remote.commits.lock().unwrap()[0].0, "keep.md");
    }

    #[tokio::test]
    async fn remote_failure_is_returned_and_reported_to_chat() {
        let h = harness();
        *h.remote.fail_with.lock().unwrap() = Some(409);

        let err = h
            .service
            .handle(ChatEvent::from_text(ChatId(7), "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteSync { status: 409, .. }));

        let messages = h.chat.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("❌ Could not save scroll.md: "));
        assert!(messages[0].contains("409"));
    }

    #[tokio::test]
    async fn failed_acknowledgment_does_not_undo_a_save() {
        let h = harness();
        *h.chat.offline.lock().unwrap() = true;

        let outcome = h
            .service
            .handle(ChatEvent::from_text(ChatId(7), "kept anyway"))
            .await
            .unwrap();
        assert!(matches!(outcome, CaptureOutcome::Saved { .. }));
        assert_eq!(h.remote.commits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn escaping_or_hidden_filenames_are_rejected_at_directive_time() {
        let h = harness();
        for directive in ["save as: ../outside.md", "save as: .", "save as: .sessions.json"] {
            let outcome = h
                .service
                .handle(ChatEvent::from_text(ChatId(7), directive))
                .await
                .unwrap();
            assert_eq!(outcome, CaptureOutcome::FilenameRejected, "{directive}");
        }
        assert!(h.chat.messages().iter().all(|m| m.starts_with("⚠️")));

        h.service
            .handle(ChatEvent::from_text(ChatId(7), "hello"))
            .await
            .unwrap();
        assert_eq!(h.remote.commits.lock().unwrap()[0].0, "scroll.md");
        assert!(!h.service.documents().root().join(".sessions.json").exists());
    }

    #[tokio::test]
    async fn ignored_events_have_no_side_effects() {
        let h = harness();
        assert_eq!(
            h.service.handle(ChatEvent::Ignored).await.unwrap(),
            CaptureOutcome::Ignored
        );
        assert!(h.chat.messages().is_empty());
        assert!(h.remote.commits.lock().unwrap().is_empty());
    }
}
