pub mod conversation_list;
pub mod conversation_view;
pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod register;

use adw::Application;
use adw::prelude::*;
use clinic_dashboard::api::models::Conversation;
use clinic_dashboard::dashboard::DashboardState;
use clinic_dashboard::session::ChannelNavigator;
use clinic_dashboard::storage::{CredentialStore, MemoryTokenStore, TokenStore};
use clinic_dashboard::{AppConfig, AppContext, Route};
use gtk4 as gtk;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

/// The single window; every route is rendered into it.
pub struct Shell {
    window: adw::ApplicationWindow,
    ctx: AppContext,
    // last dashboard load, kept in step with changes made from other views
    dashboard: RefCell<Option<DashboardState>>,
}

impl Shell {
    fn new(app: &Application, ctx: AppContext) -> Rc<Self> {
        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title("Mensagens Automáticas")
            .default_width(1024)
            .default_height(680)
            .build();
        Rc::new(Self { window, ctx, dashboard: RefCell::new(None) })
    }

    pub fn ctx(&self) -> &AppContext {
        &self.ctx
    }

    /// Queue a navigation; the route loop picks it up on the main thread.
    pub fn navigate(&self, route: Route) {
        self.ctx.session.navigate(route);
    }

    pub fn set_dashboard(&self, state: DashboardState) {
        self.dashboard.replace(Some(state));
    }

    pub fn dashboard(&self) -> Option<DashboardState> {
        self.dashboard.borrow().clone()
    }

    /// Runs `f` against the cached dashboard, if one was loaded.
    pub fn update_dashboard<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> Option<R> {
        self.dashboard.borrow_mut().as_mut().map(f)
    }

    pub fn cached_conversation(&self, id: &str) -> Option<Conversation> {
        self.dashboard.borrow().as_ref().and_then(|d| d.conversation(id)).cloned()
    }

    fn show(self: &Rc<Self>, requested: Route) {
        let route = self.ctx.session.guard().check(requested).into_route();
        log::debug!("showing {route}");
        if matches!(route, Route::Login { .. }) {
            self.dashboard.replace(None);
        }
        let page = match route {
            Route::Login { from } => login::page(self, from),
            Route::Register => register::page(self),
            Route::Dashboard => dashboard::page(self),
            Route::Conversation(id) => conversation_view::page(self, id),
            Route::NotFound => not_found::page(self),
        };
        self.window.set_content(Some(&page));
    }
}

pub fn build_ui(app: &Application) {
    let config = AppConfig::load();
    let store: Arc<dyn TokenStore> = match CredentialStore::open_default(config.cookie_options()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("credential store unavailable, session will not persist: {e}");
            Arc::new(MemoryTokenStore::default())
        }
    };
    let (navigator, mut routes) = ChannelNavigator::channel();
    let ctx = match AppContext::new(config, store, Arc::new(navigator)) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("cannot start: {e}");
            return;
        }
    };

    let shell = Shell::new(app, ctx);
    {
        let shell = shell.clone();
        glib::spawn_future_local(async move {
            while let Some(route) = routes.recv().await {
                shell.show(route);
            }
        });
    }
    shell.navigate(Route::Dashboard);
    shell.window.present();
}

/// Run `fut` on the background runtime and hand its output to `on_done` on the
/// GTK main loop.
pub fn run_async_to_main<T, Fut, F>(fut: Fut, on_done: F)
where
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    F: FnOnce(T) + 'static,
{
    let handle = match clinic_dashboard::utils::spawn_async(fut) {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("could not start background runtime: {e}");
            return;
        }
    };
    glib::spawn_future_local(async move {
        match handle.await {
            Ok(value) => on_done(value),
            Err(e) => log::error!("background task failed: {e}"),
        }
    });
}

/// Header bar plus a toast overlay around `body`.
pub fn frame(title: &str, body: &impl IsA<gtk::Widget>) -> (gtk::Box, adw::HeaderBar, adw::ToastOverlay) {
    let overlay = adw::ToastOverlay::new();
    overlay.set_child(Some(body));
    overlay.set_vexpand(true);

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some(title));
    title.add_css_class("heading");
    header.set_title_widget(Some(&title));
    container.append(&header);
    container.append(&overlay);
    (container, header, overlay)
}

pub fn clear_box(container: &gtk::Box) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }
}

pub fn error_label() -> gtk::Label {
    let label = gtk::Label::new(None);
    label.add_css_class("error");
    label.set_halign(gtk::Align::Start);
    label.set_wrap(true);
    label.set_visible(false);
    label
}

pub fn show_error(label: &gtk::Label, message: &str) {
    label.set_label(message);
    label.set_visible(true);
}
