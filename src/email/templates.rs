pub fn render_workspace_invite(
    name: &str,
    workspace_name: &str,
    email: &str,
    provisional_password: &str,
    base_url: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Você foi convidado para {workspace_name}</h2>
    <p>Olá {name},</p>
    <p>Uma conta foi criada para você como administrador do workspace <strong>{workspace_name}</strong>.</p>
    <p>Email: <strong>{email}</strong><br>Senha provisória: <strong>{provisional_password}</strong></p>
    <p><a href="{base_url}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Entrar</a></p>
    <p style="color: #666; font-size: 14px;">Troque a senha provisória no primeiro acesso.</p>
</body>
</html>"#
    )
}

pub fn render_member_added(name: &str, workspace_name: &str, base_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Você foi adicionado a {workspace_name}</h2>
    <p>Olá {name},</p>
    <p>Você agora é membro do workspace <strong>{workspace_name}</strong> no Workhub.</p>
    <p><a href="{base_url}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Entrar</a></p>
</body>
</html>"#
    )
}
