//! Canned clients for demos and tests.

use crate::client::{Client, ClientStatus};
use crate::registry::ClientRegistry;
use agencyzen_core::ClientId;
use chrono::{DateTime, TimeZone, Utc};

/// The four clients the dashboard ships with.
#[must_use]
pub fn sample_clients() -> ClientRegistry {
    let mut registry = ClientRegistry::new();
    let seeds = [
        seed(
            "João Silva",
            "Tech Solutions LTDA",
            "joao@techsolutions.com",
            "+55 11 99999-1234",
            "👨‍💼",
            ClientStatus::Active,
            &["whatsapp", "social"],
            day(2025, 11, 15),
            day(2026, 1, 6),
        ),
        seed(
            "Maria Santos",
            "Loja Criativa",
            "maria@lojacriativa.com.br",
            "+55 21 98888-5678",
            "👩‍💻",
            ClientStatus::Active,
            &["social", "traffic"],
            day(2025, 12, 1),
            day(2026, 1, 7),
        ),
        seed(
            "Carlos Oliveira",
            "Startup Inovadora",
            "carlos@startupino.io",
            "+55 31 97777-9012",
            "🧑‍🚀",
            ClientStatus::Pending,
            &["traffic"],
            day(2026, 1, 2),
            day(2026, 1, 5),
        ),
        seed(
            "Ana Ferreira",
            "Moda Zen",
            "ana@modazen.com.br",
            "+55 41 96666-3456",
            "👩‍🎨",
            ClientStatus::Active,
            &["whatsapp", "social", "traffic"],
            day(2025, 10, 20),
            day(2026, 1, 7),
        ),
    ];
    for client in seeds {
        registry.add(client).expect("sample clients are well-formed");
    }
    registry
}

#[expect(clippy::too_many_arguments)]
fn seed(
    name: &str,
    company: &str,
    email: &str,
    phone: &str,
    avatar: &str,
    status: ClientStatus,
    agents: &[&str],
    created_at: DateTime<Utc>,
    last_contact: DateTime<Utc>,
) -> Client {
    Client {
        id: ClientId::new(),
        name: name.to_string(),
        company: company.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        avatar: avatar.to_string(),
        status,
        assigned_agents: agents.iter().map(ToString::to_string).collect(),
        created_at,
        last_contact,
    }
}

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("sample dates are valid")
}
