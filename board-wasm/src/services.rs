use board_client::{AuthContext, BoardApi, Notifier, QueryCache, TokenSource};
use chrono::Utc;
use std::cell::RefCell;
use std::rc::Rc;

/// Process-wide objects built once at startup and handed down as properties.
#[derive(Clone)]
pub struct Services {
    pub api: Rc<dyn BoardApi>,
    pub notifier: Rc<dyn Notifier>,
    pub cache: QueryCache,
    pub tokens: Rc<dyn TokenSource>,
    auth: Rc<RefCell<AuthContext>>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        self.cache == other.cache && Rc::ptr_eq(&self.auth, &other.auth)
    }
}

impl Services {
    pub fn new(
        api: Rc<dyn BoardApi>,
        notifier: Rc<dyn Notifier>,
        cache: QueryCache,
        tokens: Rc<dyn TokenSource>,
    ) -> Self {
        let auth = AuthContext::load(tokens.as_ref(), Utc::now());
        Self {
            api,
            notifier,
            cache,
            tokens,
            auth: Rc::new(RefCell::new(auth)),
        }
    }

    /// Current auth state; an expired session is re-validated against storage first.
    pub fn auth(&self) -> AuthContext {
        let mut auth = self.auth.borrow_mut();
        if auth.revalidate(self.tokens.as_ref(), Utc::now()) {
            log::info!("Authentication state changed after re-validation");
        }
        auth.clone()
    }
}
