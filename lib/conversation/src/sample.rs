//! Canned inbox for demos and tests.

use crate::conversation::{Contact, Conversation, Presence};
use crate::inbox::Inbox;
use crate::message::{DeliveryState, Message};
use chrono::Duration;

/// The five conversations the dashboard ships with, including Isabella's
/// full thread.
#[must_use]
pub fn sample_inbox() -> Inbox {
    let mut inbox = Inbox::new();
    inbox.add(isabella());
    inbox.add(seed(
        "João Silva",
        "+55 11 99999-0002",
        "Perfeito, vou aguardar o orçamento",
        30,
        Presence::Offline,
        &["Cliente"],
        None,
        DeliveryState::Read,
        0,
    ));
    inbox.add(seed(
        "Carla Almeida",
        "+55 11 99999-0003",
        "Qual o prazo de entrega?",
        60,
        Presence::Typing,
        &["Negociação"],
        Some("Zap Zen"),
        DeliveryState::Delivered,
        1,
    ));
    inbox.add(seed(
        "Tech Solutions",
        "+55 11 99999-0004",
        "O projeto está em andamento",
        120,
        Presence::Offline,
        &["Cliente VIP"],
        None,
        DeliveryState::Read,
        0,
    ));
    inbox.add(seed(
        "Maria Santos",
        "+55 11 99999-0005",
        "Obrigado pelo atendimento!",
        1440,
        Presence::Offline,
        &["Concluído"],
        None,
        DeliveryState::Read,
        0,
    ));
    inbox
}

fn isabella() -> Conversation {
    let mut conversation = Conversation::new(Contact::new("Isabella Rainer", "+55 11 99999-0001"))
        .with_presence(Presence::Online)
        .with_tags(["Lead", "Interessado"])
        .with_agent("Zap Zen");

    let thread = [
        backdated(
            Message::user("Olá! Gostaria de saber mais sobre os serviços de marketing da agência")
                .with_state(DeliveryState::Read),
            10,
        ),
        backdated(
            Message::bot(
                "Olá Isabella! 👋 Seja bem-vinda! Ficamos felizes com seu interesse.\n\nNós \
                 oferecemos serviços completos de marketing digital, incluindo:\n\n• Gestão de \
                 Redes Sociais\n• Tráfego Pago (Meta & Google Ads)\n• Criação de Conteúdo\n• \
                 Branding e Identidade Visual\n\nPosso saber mais sobre o seu negócio?",
            )
            .with_state(DeliveryState::Read),
            9,
        ),
        backdated(
            Message::user("Tenho uma loja de roupas femininas e preciso aumentar as vendas online")
                .with_state(DeliveryState::Read),
            5,
        ),
        backdated(
            Message::bot(
                "Excelente! 🛍️ Moda feminina é um nicho com muito potencial online.\n\nPara \
                 lojas como a sua, recomendamos um combo de:\n\n1. **Instagram + Facebook** - \
                 Vitrine visual dos produtos\n2. **Tráfego Pago** - Anúncios segmentados para \
                 seu público\n3. **WhatsApp** - Atendimento e fechamento de vendas\n\nQual seu \
                 orçamento mensal aproximado para marketing?",
            )
            .with_state(DeliveryState::Delivered),
            4,
        ),
    ];
    for message in thread {
        conversation.last_activity = message.at;
        conversation.messages.push(message);
    }
    conversation.unread = 2;
    conversation
}

#[expect(clippy::too_many_arguments)]
fn seed(
    name: &str,
    phone: &str,
    last_message: &str,
    minutes_ago: i64,
    presence: Presence,
    tags: &[&str],
    agent: Option<&str>,
    state: DeliveryState,
    unread: u32,
) -> Conversation {
    let mut conversation = Conversation::new(Contact::new(name, phone))
        .with_presence(presence)
        .with_tags(tags.iter().copied());
    if let Some(agent) = agent {
        conversation = conversation.with_agent(agent);
    }
    let message = backdated(Message::user(last_message).with_state(state), minutes_ago);
    conversation.last_activity = message.at;
    conversation.messages.push(message);
    conversation.unread = unread;
    conversation
}

fn backdated(mut message: Message, minutes_ago: i64) -> Message {
    message.at = chrono::Utc::now() - Duration::minutes(minutes_ago);
    message
}
