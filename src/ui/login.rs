use super::Shell;
use adw::prelude::*;
use clinic_dashboard::Route;
use clinic_dashboard::forms::LoginForm;
use gtk4 as gtk;
use std::rc::Rc;

pub fn page(shell: &Rc<Shell>, from: Option<String>) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);
    root.set_valign(gtk::Align::Center);
    root.set_halign(gtk::Align::Center);
    root.set_width_request(380);

    let title = gtk::Label::new(Some("Bem-vindo de volta!"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let subtitle = gtk::Label::new(Some("Coloque seu email e senha para acessar a sua conta."));
    subtitle.add_css_class("dim-label");
    subtitle.set_halign(gtk::Align::Start);
    subtitle.set_wrap(true);
    root.append(&subtitle);

    let error = super::error_label();
    root.append(&error);

    let email_entry = gtk::Entry::new();
    email_entry.set_placeholder_text(Some("Coloque seu email"));
    email_entry.set_input_purpose(gtk::InputPurpose::Email);
    email_entry.set_hexpand(true);

    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("Senha"));
    pass_entry.set_show_peek_icon(true);
    pass_entry.set_hexpand(true);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&email_entry);
    form.append(&pass_entry);
    root.append(&form);

    let login_btn = gtk::Button::with_label("Entrar");
    login_btn.add_css_class("suggested-action");
    root.append(&login_btn);

    let register_btn = gtk::Button::with_label("Não tem conta? Cadastre-se");
    register_btn.add_css_class("flat");
    root.append(&register_btn);

    let (container, _header, _overlay) = super::frame("Mensagens Automáticas", &root);

    let on_submit = {
        let shell = shell.clone();
        let email_entry = email_entry.clone();
        let pass_entry = pass_entry.clone();
        let error = error.clone();
        let login_btn = login_btn.clone();
        move || {
            let form = LoginForm::new(email_entry.text().to_string(), pass_entry.text().to_string());
            error.set_visible(false);
            login_btn.set_sensitive(false);

            let auth = shell.ctx().auth.clone();
            let from = from.clone();
            let error = error.clone();
            let login_btn = login_btn.clone();
            // success navigates on its own
            super::run_async_to_main(
                async move { auth.login(&form, from.as_deref()).await },
                move |res| {
                    login_btn.set_sensitive(true);
                    if let Err(e) = res {
                        super::show_error(&error, &e.user_message());
                    }
                },
            );
        }
    };

    let on_submit: Rc<dyn Fn()> = Rc::new(on_submit);
    {
        let on_submit = on_submit.clone();
        login_btn.connect_clicked(move |_| (on_submit)());
    }
    {
        let on_submit = on_submit.clone();
        email_entry.connect_activate(move |_| (on_submit)());
    }
    {
        let on_submit = on_submit.clone();
        pass_entry.connect_activate(move |_| (on_submit)());
    }
    {
        let shell = shell.clone();
        register_btn.connect_clicked(move |_| shell.navigate(Route::Register));
    }

    container.upcast()
}
