use super::Shell;
use adw::prelude::*;
use clinic_dashboard::Route;
use gtk4 as gtk;
use std::rc::Rc;

pub fn page(shell: &Rc<Shell>) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_valign(gtk::Align::Center);
    root.set_halign(gtk::Align::Center);

    let code = gtk::Label::new(Some("404"));
    code.add_css_class("title-1");
    root.append(&code);

    let title = gtk::Label::new(Some("Página não encontrada"));
    title.add_css_class("title-3");
    root.append(&title);

    let hint = gtk::Label::new(Some("A página que você está procurando não existe ou foi movida."));
    hint.add_css_class("dim-label");
    root.append(&hint);

    let back = gtk::Button::with_label("Voltar para o Dashboard");
    back.add_css_class("suggested-action");
    back.set_halign(gtk::Align::Center);
    let shell = shell.clone();
    back.connect_clicked(move |_| shell.navigate(Route::Dashboard));
    root.append(&back);

    let (container, _header, _overlay) = super::frame("Mensagens Automáticas", &root);
    container.upcast()
}
