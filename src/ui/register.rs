use super::Shell;
use adw::prelude::*;
use clinic_dashboard::Route;
use clinic_dashboard::forms::RegisterForm;
use gtk4 as gtk;
use std::rc::Rc;

fn labelled(label: &str, field: &impl IsA<gtk::Widget>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Vertical, 4);
    let caption = gtk::Label::new(Some(label));
    caption.set_halign(gtk::Align::Start);
    caption.add_css_class("caption-heading");
    row.append(&caption);
    row.append(field);
    row
}

pub fn page(shell: &Rc<Shell>) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);
    root.set_valign(gtk::Align::Center);
    root.set_halign(gtk::Align::Center);
    root.set_width_request(380);

    let title = gtk::Label::new(Some("Crie sua conta"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let subtitle = gtk::Label::new(Some("Preencha os campos abaixo para se cadastrar."));
    subtitle.add_css_class("dim-label");
    subtitle.set_halign(gtk::Align::Start);
    root.append(&subtitle);

    let error = super::error_label();
    root.append(&error);

    let name_entry = gtk::Entry::new();
    name_entry.set_placeholder_text(Some("Seu nome completo"));
    let email_entry = gtk::Entry::new();
    email_entry.set_placeholder_text(Some("Seu email"));
    email_entry.set_input_purpose(gtk::InputPurpose::Email);
    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("Mínimo de 8 caracteres"));
    pass_entry.set_show_peek_icon(true);
    let confirm_entry = gtk::PasswordEntry::new();
    confirm_entry.set_placeholder_text(Some("Repita a senha"));
    confirm_entry.set_show_peek_icon(true);

    let form = gtk::Box::new(gtk::Orientation::Vertical, 8);
    form.append(&labelled("Nome Completo", &name_entry));
    form.append(&labelled("Email", &email_entry));
    form.append(&labelled("Senha", &pass_entry));
    form.append(&labelled("Confirmar Senha", &confirm_entry));
    root.append(&form);

    let submit_btn = gtk::Button::with_label("Cadastrar");
    submit_btn.add_css_class("suggested-action");
    root.append(&submit_btn);

    let login_btn = gtk::Button::with_label("Já tem uma conta? Entrar");
    login_btn.add_css_class("flat");
    root.append(&login_btn);

    let (container, _header, _overlay) = super::frame("Mensagens Automáticas", &root);

    {
        let shell = shell.clone();
        let error = error.clone();
        let submit = submit_btn.clone();
        submit_btn.connect_clicked(move |_| {
            let form = RegisterForm {
                name: name_entry.text().to_string(),
                email: email_entry.text().to_string(),
                password: pass_entry.text().to_string(),
                confirmation: confirm_entry.text().to_string(),
            };
            error.set_visible(false);
            // inline feedback without a round trip through the runtime
            if let Err(e) = form.validate() {
                super::show_error(&error, &e.to_string());
                return;
            }
            submit.set_sensitive(false);

            let auth = shell.ctx().auth.clone();
            let error = error.clone();
            let submit = submit.clone();
            // fields stay filled on failure so the user can correct them
            super::run_async_to_main(async move { auth.register(&form).await }, move |res| {
                submit.set_sensitive(true);
                if let Err(e) = res {
                    super::show_error(&error, &e.user_message());
                }
            });
        });
    }
    {
        let shell = shell.clone();
        login_btn.connect_clicked(move |_| shell.navigate(Route::login()));
    }

    container.upcast()
}
