use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const PAGE_SIZE: usize = 10;
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(180);
pub const MAX_SESSION_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

const CUSTOM_ID_PREFIX: &str = "pets_page";

pub fn chunk_lines(lines: Vec<String>, size: usize) -> Vec<Vec<String>> {
    let size = size.max(1);
    let mut pages = Vec::with_capacity(lines.len().div_ceil(size));
    let mut iter = lines.into_iter().peekable();
    while iter.peek().is_some() {
        pages.push(iter.by_ref().take(size).collect());
    }
    pages
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAction {
    First,
    Prev,
    Next,
    Last,
}

impl PageAction {
    pub const ALL: [PageAction; 4] = [
        PageAction::First,
        PageAction::Prev,
        PageAction::Next,
        PageAction::Last,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageAction::First => "first",
            PageAction::Prev => "prev",
            PageAction::Next => "next",
            PageAction::Last => "last",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == text)
    }
}

/// A fixed set of pages and a cursor clamped to them.
#[derive(Debug, Clone)]
pub struct Paginator<P> {
    pages: Vec<P>,
    current: usize,
}

impl<P> Paginator<P> {
    /// `None` when there is nothing to page through.
    pub fn new(pages: Vec<P>) -> Option<Self> {
        if pages.is_empty() {
            None
        } else {
            Some(Self { pages, current: 0 })
        }
    }

    pub fn apply(&mut self, action: PageAction) -> usize {
        self.current = match action {
            PageAction::First => 0,
            PageAction::Prev => self.current.saturating_sub(1),
            PageAction::Next => (self.current + 1).min(self.max_page()),
            PageAction::Last => self.max_page(),
        };
        self.current
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &P {
        &self.pages[self.current]
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn max_page(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn at_start(&self) -> bool {
        self.current == 0
    }

    pub fn at_end(&self) -> bool {
        self.current == self.max_page()
    }

    pub fn indicator(&self) -> String {
        format!("Page {}/{}", self.current + 1, self.pages.len())
    }
}

/// What the transport needs to redraw a paginated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<P> {
    pub page: P,
    pub index: usize,
    pub total: usize,
    pub at_start: bool,
    pub at_end: bool,
    pub indicator: String,
}

impl<P: Clone> From<&Paginator<P>> for PageView<P> {
    fn from(paginator: &Paginator<P>) -> Self {
        Self {
            page: paginator.current().clone(),
            index: paginator.current_index(),
            total: paginator.page_count(),
            at_start: paginator.at_start(),
            at_end: paginator.at_end(),
            indicator: paginator.indicator(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("page session {0:x} does not exist")]
    Unknown(u64),
    #[error("page session {0:x} has expired")]
    Expired(u64),
}

/// Channel and message ids of the message a session drives.
pub type MessageRef = (u64, u64);

#[derive(Debug)]
struct PageSession<P> {
    paginator: Paginator<P>,
    expires_at: Instant,
    message: Option<MessageRef>,
}

/// Live paginated responses keyed by a random session id.
pub struct SessionRegistry<P> {
    sessions: Mutex<HashMap<u64, PageSession<P>>>,
    timeout: Duration,
}

impl<P: Clone> SessionRegistry<P> {
    /// `timeout` is clamped to `MAX_SESSION_TIMEOUT`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout: timeout.min(MAX_SESSION_TIMEOUT),
        }
    }

    fn deadline(&self, now: Instant) -> Instant {
        now.checked_add(self.timeout).unwrap_or(now)
    }

    pub fn open(&self, pages: Vec<P>, now: Instant) -> Option<(u64, PageView<P>)> {
        let paginator = Paginator::new(pages)?;
        let view = PageView::from(&paginator);
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let mut id: u64 = rand::random();
        while sessions.contains_key(&id) {
            id = rand::random();
        }
        sessions.insert(
            id,
            PageSession {
                paginator,
                expires_at: self.deadline(now),
                message: None,
            },
        );
        Some((id, view))
    }

    pub fn attach_message(&self, id: u64, message: MessageRef) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = sessions.get_mut(&id) {
            session.message = Some(message);
        }
    }

    /// Moves the cursor and extends the session. Expired sessions are left
    /// untouched until swept.
    pub fn navigate(
        &self,
        id: u64,
        action: PageAction,
        now: Instant,
    ) -> Result<PageView<P>, NavigationError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&id).ok_or(NavigationError::Unknown(id))?;
        if now >= session.expires_at {
            return Err(NavigationError::Expired(id));
        }
        session.paginator.apply(action);
        session.expires_at = self.deadline(now);
        Ok(PageView::from(&session.paginator))
    }

    /// Removes expired sessions, returning the messages they were attached to.
    pub fn evict_expired(&self, now: Instant) -> Vec<MessageRef> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let mut evicted = Vec::new();
        sessions.retain(|_, session| {
            if now >= session.expires_at {
                evicted.extend(session.message);
                false
            } else {
                true
            }
        });
        evicted
    }

    #[cfg(test)]
    fn peek(&self, id: u64) -> Option<(usize, Instant)> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&id)
            .map(|session| (session.paginator.current_index(), session.expires_at))
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub fn custom_id(session: u64, action: &str) -> String {
    format!("{}:{:x}:{}", CUSTOM_ID_PREFIX, session, action)
}

/// Maps a button id back to its session and action; foreign ids give `None`.
pub fn parse_custom_id(id: &str) -> Option<(u64, PageAction)> {
    let mut parts = id.splitn(3, ':');
    if parts.next()? != CUSTOM_ID_PREFIX {
        return None;
    }
    let session = u64::from_str_radix(parts.next()?, 16).ok()?;
    let action = PageAction::parse(parts.next()?)?;
    Some((session, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_chunk_23_lines() {
        let pages = chunk_lines(lines(23), PAGE_SIZE);
        let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(pages[2][0], "line 21");
        assert!(chunk_lines(Vec::new(), PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut paginator = Paginator::new(chunk_lines(lines(23), PAGE_SIZE)).unwrap();
        assert!(paginator.at_start());
        assert_eq!(paginator.apply(PageAction::Prev), 0);
        assert_eq!(paginator.apply(PageAction::Last), 2);
        assert!(paginator.at_end());
        assert_eq!(paginator.apply(PageAction::Next), 2);
        assert_eq!(paginator.apply(PageAction::Prev), 1);
        assert_eq!(paginator.indicator(), "Page 2/3");
        assert_eq!(paginator.apply(PageAction::First), 0);
    }

    #[test]
    fn test_single_page_is_both_ends() {
        let paginator = Paginator::new(vec!["only"]).unwrap();
        assert!(paginator.at_start() && paginator.at_end());
        assert!(Paginator::<&str>::new(Vec::new()).is_none());
    }

    #[test]
    fn test_session_navigation_and_expiry() {
        let registry = SessionRegistry::new(Duration::from_secs(180));
        let start = Instant::now();
        let (id, view) = registry.open(vec!["a", "b", "c"], start).unwrap();
        assert_eq!(view.page, "a");
        assert!(view.at_start);

        let later = start + Duration::from_secs(100);
        let view = registry.navigate(id, PageAction::Last, later).unwrap();
        assert_eq!(view.page, "c");
        assert_eq!(view.indicator, "Page 3/3");

        // Inactivity is measured from the last navigation.
        let still_alive = start + Duration::from_secs(250);
        let view = registry.navigate(id, PageAction::Prev, still_alive).unwrap();
        assert_eq!(view.index, 1);

        let expired = still_alive + Duration::from_secs(180);
        let before = registry.peek(id).unwrap();
        assert_eq!(before, (1, expired));
        assert_eq!(
            registry.navigate(id, PageAction::First, expired),
            Err(NavigationError::Expired(id))
        );
        assert_eq!(
            registry.navigate(id, PageAction::Next, expired + Duration::from_secs(5)),
            Err(NavigationError::Expired(id))
        );
        // Rejected navigation leaves the cursor and deadline alone.
        assert_eq!(registry.peek(id), Some(before));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_huge_timeout_is_clamped() {
        let registry = SessionRegistry::new(Duration::MAX);
        let start = Instant::now();
        let (id, _) = registry.open(vec!["a", "b"], start).unwrap();
        assert_eq!(registry.peek(id), Some((0, start + MAX_SESSION_TIMEOUT)));

        let later = start + Duration::from_secs(60);
        let view = registry.navigate(id, PageAction::Next, later).unwrap();
        assert_eq!(view.index, 1);
        assert_eq!(registry.peek(id), Some((1, later + MAX_SESSION_TIMEOUT)));
    }

    #[test]
    fn test_unknown_session() {
        let registry: SessionRegistry<&str> = SessionRegistry::new(DEFAULT_SESSION_TIMEOUT);
        assert_eq!(
            registry.navigate(7, PageAction::Next, Instant::now()),
            Err(NavigationError::Unknown(7))
        );
    }

    #[test]
    fn test_evict_expired_returns_messages() {
        let registry = SessionRegistry::new(Duration::from_secs(10));
        let start = Instant::now();
        let (old, _) = registry.open(vec![1], start).unwrap();
        registry.attach_message(old, (11, 22));
        let (fresh, _) = registry.open(vec![2], start + Duration::from_secs(8)).unwrap();

        let evicted = registry.evict_expired(start + Duration::from_secs(12));
        assert_eq!(evicted, vec![(11, 22)]);
        assert_eq!(registry.len(), 1);
        assert!(
            registry
                .navigate(fresh, PageAction::Next, start + Duration::from_secs(12))
                .is_ok()
        );
        assert_eq!(
            registry.navigate(old, PageAction::Next, start + Duration::from_secs(12)),
            Err(NavigationError::Unknown(old))
        );
    }

    #[test]
    fn test_custom_id_round_trip() {
        let id = custom_id(0xdead_beef, PageAction::Next.as_str());
        assert_eq!(id, "pets_page:deadbeef:next");
        assert_eq!(parse_custom_id(&id), Some((0xdead_beef, PageAction::Next)));
        assert_eq!(parse_custom_id("pets_page:deadbeef:indicator"), None);
        assert_eq!(parse_custom_id("report_confirm:1:next"), None);
    }
}
