use super::Shell;
use adw::prelude::*;
use clinic_dashboard::api::models::{Conversation, Sender};
use clinic_dashboard::{ApiError, Route};
use gtk4 as gtk;
use std::rc::Rc;

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "Paciente",
        Sender::Clinic => "Clínica",
        Sender::System => "Sistema",
    }
}

pub fn page(shell: &Rc<Shell>, id: String) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
    root.set_margin_top(8);
    root.set_margin_bottom(8);
    root.set_margin_start(8);
    root.set_margin_end(8);

    let spinner = gtk::Spinner::new();
    spinner.set_vexpand(true);
    spinner.start();
    root.append(&spinner);

    let title = shell.cached_conversation(&id).map_or_else(|| "Conversa".to_string(), |c| c.name);
    let (container, header, overlay) = super::frame(&title, &root);

    let back_btn = gtk::Button::with_label("Voltar");
    header.pack_start(&back_btn);
    {
        let shell = shell.clone();
        back_btn.connect_clicked(move |_| shell.navigate(Route::Dashboard));
    }

    let review_btn = gtk::Button::with_label("Marcar como revisada");
    review_btn.add_css_class("suggested-action");
    review_btn.set_sensitive(false);
    header.pack_end(&review_btn);

    {
        let api = shell.ctx().api.clone();
        let id = id.clone();
        let header = header.clone();
        let overlay = overlay.clone();
        let review_btn = review_btn.clone();
        super::run_async_to_main(async move { api.conversation(&id).await }, move |res| {
            super::clear_box(&root);
            match res {
                Ok(conv) => {
                    header.set_title_widget(Some(&gtk::Label::new(Some(&conv.name))));
                    set_reviewed(&review_btn, conv.reviewed);
                    render_messages(&root, &conv);
                }
                Err(ApiError::Unauthorized) => {}
                Err(e) => {
                    overlay.add_toast(adw::Toast::new(&e.user_message()));
                    let msg = gtk::Label::new(Some("Não foi possível carregar a conversa."));
                    msg.add_css_class("dim-label");
                    msg.set_vexpand(true);
                    root.append(&msg);
                }
            }
        });
    }

    {
        let shell = shell.clone();
        review_btn.connect_clicked(move |btn| {
            btn.set_sensitive(false);
            let api = shell.ctx().api.clone();
            let shell = shell.clone();
            let id = id.clone();
            let btn = btn.clone();
            let overlay = overlay.clone();
            super::run_async_to_main(async move { api.mark_reviewed(&id).await }, move |res| match res {
                Ok(conv) => {
                    shell.update_dashboard(|d| d.apply_reviewed(conv));
                    set_reviewed(&btn, true);
                    overlay.add_toast(adw::Toast::new("Conversa marcada como revisada."));
                }
                Err(ApiError::Unauthorized) => {}
                Err(e) => {
                    btn.set_sensitive(true);
                    overlay.add_toast(adw::Toast::new(&e.user_message()));
                }
            });
        });
    }

    container.upcast()
}

fn set_reviewed(btn: &gtk::Button, reviewed: bool) {
    if reviewed {
        btn.set_label("Revisada");
        btn.set_sensitive(false);
    } else {
        btn.set_sensitive(true);
    }
}

fn render_messages(root: &gtk::Box, conv: &Conversation) {
    let scroller = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hexpand(true)
        .build();
    let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 8);
    if conv.messages.is_empty() {
        let lbl = gtk::Label::new(Some(conv.preview()));
        lbl.add_css_class("dim-label");
        messages_box.append(&lbl);
    }
    for msg in &conv.messages {
        let align = match msg.sender {
            Sender::User => gtk::Align::Start,
            Sender::Clinic | Sender::System => gtk::Align::End,
        };
        let bubble = gtk::Box::new(gtk::Orientation::Vertical, 2);
        bubble.set_halign(align);
        let meta = gtk::Label::new(Some(&format!("{} · {}", sender_label(msg.sender), msg.timestamp)));
        meta.add_css_class("caption");
        meta.add_css_class("dim-label");
        meta.set_halign(align);
        let text = gtk::Label::new(Some(&msg.content));
        text.set_wrap(true);
        text.set_selectable(true);
        text.set_halign(align);
        bubble.append(&meta);
        bubble.append(&text);
        messages_box.append(&bubble);
    }
    scroller.set_child(Some(&messages_box));
    root.append(&scroller);

    // upper is only known once the messages are allocated; follow it to the newest
    scroller.vadjustment().connect_changed(|adj| adj.set_value(adj.upper() - adj.page_size()));
}
