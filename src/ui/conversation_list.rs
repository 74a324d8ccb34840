use clinic_dashboard::api::models::Conversation;
use gtk4::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;

pub struct ConversationList {
    root: gtk::Box,
    list: gtk::ListBox,
    empty: gtk::Label,
    ids: Rc<RefCell<Vec<String>>>,
}

impl ConversationList {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_vexpand(true);

        let title = gtk::Label::new(Some("Conversas Ativas"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let empty = gtk::Label::new(Some("Nenhuma conversa disponível"));
        empty.add_css_class("dim-label");
        empty.set_visible(false);
        root.append(&empty);

        let list = gtk::ListBox::new();
        list.add_css_class("boxed-list");
        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .child(&list)
            .build();
        root.append(&scroller);

        Self { root, list, empty, ids: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn connect_activated<F: Fn(String) + 'static>(&self, f: F) {
        let ids = self.ids.clone();
        self.list.connect_row_activated(move |_, row| {
            let id = usize::try_from(row.index()).ok().and_then(|i| ids.borrow().get(i).cloned());
            if let Some(id) = id {
                f(id);
            }
        });
    }

    pub fn set_items(&self, items: Vec<Conversation>) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        self.empty.set_visible(items.is_empty());
        let mut ids = self.ids.borrow_mut();
        ids.clear();
        for conv in items {
            let row = gtk::ListBoxRow::new();
            let body = gtk::Box::new(gtk::Orientation::Vertical, 2);
            body.set_margin_top(8);
            body.set_margin_bottom(8);
            body.set_margin_start(8);
            body.set_margin_end(8);

            let top = gtk::Box::new(gtk::Orientation::Horizontal, 6);
            let name = gtk::Label::new(Some(&conv.name));
            name.add_css_class("heading");
            name.set_halign(gtk::Align::Start);
            name.set_hexpand(true);
            let count = gtk::Label::new(Some(&conv.messages.len().to_string()));
            count.add_css_class("accent");
            top.append(&name);
            top.append(&count);
            body.append(&top);

            let preview = gtk::Label::new(Some(conv.preview()));
            preview.add_css_class("dim-label");
            preview.set_halign(gtk::Align::Start);
            preview.set_ellipsize(gtk::pango::EllipsizeMode::End);
            body.append(&preview);

            if let Some(last) = conv.last_message() {
                let when = gtk::Label::new(Some(&last.timestamp));
                when.add_css_class("caption");
                when.add_css_class("dim-label");
                when.set_halign(gtk::Align::Start);
                body.append(&when);
            }

            row.set_child(Some(&body));
            self.list.append(&row);
            ids.push(conv.id);
        }
    }
}
