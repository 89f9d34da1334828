use std::sync::Arc;

use actors::actor_ref::ActorRef;
use directions::DirectionsService;
use editor::{
    session::{self, EditorSession, LandmarkEvent},
    surface::{EditorContext, HeadlessList, HeadlessMap, HiddenField},
    EditorConfig, RouteEditor,
};
use indexmap::IndexMap;
use tokio::sync::{broadcast, RwLock};
use utility::id::{Id, IdSequence};

const LANDMARK_EVENT_BUFFER: usize = 16;

/// A running session and the bus its landmark events travel on.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: ActorRef<EditorSession>,
    pub landmarks: broadcast::Sender<LandmarkEvent>,
}

#[derive(Default)]
struct Registry {
    ids: IdSequence,
    sessions: IndexMap<Id<EditorSession>, SessionEntry>,
}

/// Every editor session started through the api. Sessions live until the
/// server stops.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SessionRegistry {
    /// Starts a session drawing into headless surfaces, seeded like a form
    /// field holding `seed`.
    pub async fn create(
        &self,
        seed: Option<String>,
        config: &EditorConfig,
        directions: Arc<dyn DirectionsService>,
    ) -> (Id<EditorSession>, SessionEntry) {
        let context = EditorContext::new(HeadlessMap::default())
            .with_waypoints_field(HiddenField::new(seed))
            .with_waypoint_list(HeadlessList::new());
        let (editor, request) = RouteEditor::new(context, config);
        let session = session::start(editor, request, directions);

        let (landmarks, receiver) = broadcast::channel(LANDMARK_EVENT_BUFFER);
        session::subscribe_landmarks(session.clone(), receiver);
        let entry = SessionEntry { session, landmarks };

        let mut registry = self.inner.write().await;
        let id = registry.ids.next();
        registry.sessions.insert(id, entry.clone());
        log::info!("Started editor session {}.", id);

        (id, entry)
    }

    pub async fn get(&self, id: Id<EditorSession>) -> Option<SessionEntry> {
        self.inner.read().await.sessions.get(&id).cloned()
    }

    /// All sessions, oldest first.
    pub async fn all(&self) -> Vec<(Id<EditorSession>, SessionEntry)> {
        self.inner
            .read()
            .await
            .sessions
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect()
    }
}
