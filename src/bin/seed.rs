use luxe_salon_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        profiles::{ActiveModel as ProfileActive, Column as ProfileCol, Entity as Profiles},
        sea_orm_active_enums::{ApprovalStatus, Role, ServiceCategory},
        services::{ActiveModel as ServiceActive, Column as ServiceCol, Entity as Services},
        shops::{ActiveModel as ShopActive, Column as ShopCol, Entity as Shops},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    services::auth_service::hash_password,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

const DEMO_SHOP_CODE: &str = "LX-DEMO01";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let domain = config.email_domain.as_str();
    let manager_email = format!("gerente@{domain}");
    let manager_id = ensure_user(&orm, &manager_email, "Gerente Demo", "gerente123").await?;
    let shop_id = ensure_shop(&orm, manager_id).await?;
    ensure_profile(&orm, manager_id, shop_id, Role::Manager).await?;

    let professional_id =
        ensure_user(&orm, &format!("barbeiro@{domain}"), "Barbeiro Demo", "barbeiro123").await?;
    ensure_profile(&orm, professional_id, shop_id, Role::Professional).await?;

    seed_services(&orm, shop_id).await?;

    println!(
        "Seed completed. Shop code: {DEMO_SHOP_CODE}, manager ID: {manager_id}, \
         professional ID: {professional_id}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    name: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        password_hash: Set(password_hash),
        profile_image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email}");
    Ok(user.id)
}

async fn ensure_shop(orm: &DatabaseConnection, manager_id: Uuid) -> anyhow::Result<Uuid> {
    if let Some(shop) = Shops::find()
        .filter(ShopCol::Code.eq(DEMO_SHOP_CODE))
        .one(orm)
        .await?
    {
        return Ok(shop.id);
    }

    let shop = ShopActive {
        id: Set(Uuid::new_v4()),
        name: Set("Luxe Demo".to_string()),
        code: Set(DEMO_SHOP_CODE.to_string()),
        manager_user_id: Set(manager_id),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured shop {}", shop.code);
    Ok(shop.id)
}

async fn ensure_profile(
    orm: &DatabaseConnection,
    user_id: Uuid,
    shop_id: Uuid,
    role: Role,
) -> anyhow::Result<()> {
    let exists = Profiles::find()
        .filter(ProfileCol::UserId.eq(user_id))
        .one(orm)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        shop_id: Set(Some(shop_id)),
        role: Set(role),
        phone: Set(Some("11999990000".to_string())),
        cpf: Set(None),
        approval_status: Set(ApprovalStatus::Active),
        approved_by_user_id: Set(None),
        approval_at: Set(None),
        rejection_at: Set(None),
        availability: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured {role:?} profile for {user_id}");
    Ok(())
}

async fn seed_services(orm: &DatabaseConnection, shop_id: Uuid) -> anyhow::Result<()> {
    let services = vec![
        ("Corte masculino", ServiceCategory::Male, 3500, 40),
        ("Barba", ServiceCategory::Male, 2500, 40),
        ("Escova", ServiceCategory::Female, 6000, 35),
        ("Corte + barba", ServiceCategory::Promo, 5000, 45),
    ];

    for (name, category, price, rate) in services {
        let exists = Services::find()
            .filter(
                Condition::all()
                    .add(ServiceCol::ShopId.eq(shop_id))
                    .add(ServiceCol::Name.eq(name)),
            )
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        ServiceActive {
            id: Set(Uuid::new_v4()),
            shop_id: Set(shop_id),
            name: Set(name.to_string()),
            category: Set(category),
            price: Set(price),
            commission_rate: Set(rate),
            active: Set(true),
            description: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded services");
    Ok(())
}
