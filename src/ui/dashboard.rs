use super::Shell;
use super::conversation_list::ConversationList;
use adw::prelude::*;
use clinic_dashboard::api::models::Metrics;
use clinic_dashboard::dashboard::DashboardState;
use clinic_dashboard::status::now_formatted;
use clinic_dashboard::{ApiError, Route};
use gtk4 as gtk;
use std::cell::Cell;
use std::rc::Rc;

pub fn page(shell: &Rc<Shell>) -> gtk::Widget {
    let body = gtk::Box::new(gtk::Orientation::Vertical, 16);
    body.set_margin_top(16);
    body.set_margin_bottom(16);
    body.set_margin_start(16);
    body.set_margin_end(16);

    let (container, header, overlay) = super::frame("Mensagens Automáticas", &body);

    let logout_btn = gtk::Button::with_label("Sair");
    header.pack_end(&logout_btn);
    {
        let shell = shell.clone();
        logout_btn.connect_clicked(move |_| shell.ctx().session.logout(true));
    }

    // show what we already have while the fresh copy loads
    let cached = shell.dashboard().is_some();
    if cached {
        render(shell, &body, &overlay);
    } else {
        let spinner = gtk::Spinner::new();
        spinner.set_size_request(48, 48);
        spinner.set_vexpand(true);
        spinner.start();
        body.append(&spinner);
    }

    let api = shell.ctx().api.clone();
    let shell = shell.clone();
    super::run_async_to_main(
        async move { DashboardState::load(&api, &now_formatted()).await },
        move |res| match res {
            Ok(state) => {
                shell.set_dashboard(state);
                super::clear_box(&body);
                render(&shell, &body, &overlay);
            }
            // the session has already sent us to the login view
            Err(ApiError::Unauthorized) => {}
            Err(e) if cached => overlay.add_toast(adw::Toast::new(&e.user_message())),
            Err(e) => {
                super::clear_box(&body);
                render_error(&shell, &body, &e);
            }
        },
    );

    container.upcast()
}

fn render(shell: &Rc<Shell>, body: &gtk::Box, overlay: &adw::ToastOverlay) {
    let Some(state) = shell.dashboard() else {
        return;
    };

    let status_row = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    let status_title = gtk::Label::new(Some("Status do Serviço"));
    status_title.add_css_class("heading");
    let switch = gtk::Switch::new();
    switch.set_active(state.status.is_active);
    switch.set_valign(gtk::Align::Center);
    let caption = gtk::Label::new(Some(&state.status.caption()));
    caption.add_css_class("dim-label");
    status_row.append(&status_title);
    status_row.append(&switch);
    status_row.append(&caption);
    body.append(&status_row);

    body.append(&metric_cards(state.metrics()));

    let list = ConversationList::new();
    list.set_items(state.pending().cloned().collect());
    {
        let shell = shell.clone();
        list.connect_activated(move |id| shell.navigate(Route::Conversation(id)));
    }
    body.append(&list.widget());

    // set while we put the switch back after a failed request
    let reverting = Rc::new(Cell::new(false));
    let shell = shell.clone();
    let overlay = overlay.clone();
    switch.connect_state_set(move |sw, active| {
        if reverting.get() {
            return glib::Propagation::Proceed;
        }
        sw.set_sensitive(false);

        let api = shell.ctx().api.clone();
        let shell = shell.clone();
        let sw = sw.clone();
        let caption = caption.clone();
        let overlay = overlay.clone();
        let reverting = reverting.clone();
        super::run_async_to_main(async move { api.set_service_status(active).await }, move |res| {
            sw.set_sensitive(true);
            match res {
                Ok(_) => {
                    let now = now_formatted();
                    let text = shell.update_dashboard(|d| {
                        d.apply_status_change(active, &now);
                        d.status.caption()
                    });
                    sw.set_state(active);
                    if let Some(text) = text {
                        caption.set_label(&text);
                    }
                }
                Err(ApiError::Unauthorized) => {}
                Err(e) => {
                    reverting.set(true);
                    sw.set_active(!active);
                    reverting.set(false);
                    overlay.add_toast(adw::Toast::new(&format!(
                        "Falha ao atualizar status do serviço. {}",
                        e.user_message()
                    )));
                }
            }
        });
        glib::Propagation::Stop
    });
}

fn metric_cards(metrics: &Metrics) -> gtk::Box {
    let cards = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    cards.set_homogeneous(true);
    for (title, value) in [
        ("Mensagens Recebidas", metrics.received.to_string()),
        ("Mensagens Enviadas", metrics.sent.to_string()),
        ("Taxa de Resposta", format!("{}%", metrics.response_rate)),
        ("Pendentes de Revisão", metrics.pending_review.to_string()),
    ] {
        let frame = gtk::Frame::new(None);
        let inner = gtk::Box::new(gtk::Orientation::Vertical, 4);
        inner.set_margin_top(12);
        inner.set_margin_bottom(12);
        inner.set_margin_start(12);
        inner.set_margin_end(12);
        let t = gtk::Label::new(Some(title));
        t.add_css_class("dim-label");
        t.set_halign(gtk::Align::Start);
        let v = gtk::Label::new(Some(&value));
        v.add_css_class("title-1");
        v.set_halign(gtk::Align::Start);
        inner.append(&t);
        inner.append(&v);
        frame.set_child(Some(&inner));
        cards.append(&frame);
    }
    cards
}

fn render_error(shell: &Rc<Shell>, body: &gtk::Box, err: &ApiError) {
    let message = gtk::Label::new(Some(&format!(
        "Falha ao carregar dados. Por favor, tente novamente.\n{}",
        err.user_message()
    )));
    message.add_css_class("error");
    message.set_wrap(true);
    message.set_vexpand(true);
    message.set_valign(gtk::Align::End);
    body.append(&message);

    let retry = gtk::Button::with_label("Tentar novamente");
    retry.set_halign(gtk::Align::Center);
    retry.set_vexpand(true);
    retry.set_valign(gtk::Align::Start);
    let shell = shell.clone();
    retry.connect_clicked(move |_| shell.navigate(Route::Dashboard));
    body.append(&retry);
}
