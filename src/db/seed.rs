// src/db/seed.rs
//
// Dados de demonstração para um banco vazio, e o admin inicial.

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        auth::{NewUser, Role, UserStatus},
        catalog::{CategoryInput, ProductInput},
    },
};

const DEMO_CATEGORIES: [(&str, &str); 4] = [
    ("Cakes", "cakes"),
    ("Pastries", "pastries"),
    ("Cookies", "cookies"),
    ("Breads", "breads"),
];

const DEMO_STOCK: i32 = 20;

struct DemoProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    // Preço em centavos
    price: i64,
    image: &'static str,
    // Índice em DEMO_CATEGORIES
    category: usize,
    featured: bool,
    bestseller: bool,
    new: bool,
    popular: bool,
    dietary: &'static [&'static str],
}

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Strawberry Dream Cake",
        slug: "strawberry-dream-cake",
        description: "Three layers of vanilla sponge filled with fresh strawberry compote and topped with smooth cream cheese frosting.",
        price: 2499,
        image: "https://images.unsplash.com/photo-1578985545062-69928b1d9587?auto=format&fit=crop&w=600&h=400&q=80",
        category: 0,
        featured: true,
        bestseller: true,
        new: false,
        popular: false,
        dietary: &["nut-free"],
    },
    DemoProduct {
        name: "Chocolate Truffle Cake",
        slug: "chocolate-truffle-cake",
        description: "Rich chocolate cake with ganache filling and chocolate shavings.",
        price: 3299,
        image: "https://images.unsplash.com/photo-1606313564200-e75d5e30476c?auto=format&fit=crop&w=400&h=300&q=80",
        category: 0,
        featured: false,
        bestseller: false,
        new: true,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Red Velvet Cake",
        slug: "red-velvet-cake",
        description: "Classic red velvet cake with rich cream cheese frosting and a moist, tender crumb.",
        price: 2899,
        image: "https://images.unsplash.com/photo-1586788224331-947f68671cf1?auto=format&fit=crop&w=400&h=300&q=80",
        category: 0,
        featured: false,
        bestseller: false,
        new: false,
        popular: true,
        dietary: &[],
    },
    DemoProduct {
        name: "Lemon Drizzle Cake",
        slug: "lemon-drizzle-cake",
        description: "Light and zesty lemon cake with a tangy lemon drizzle topping.",
        price: 2299,
        image: "https://images.unsplash.com/photo-1519869325930-281384150729?auto=format&fit=crop&w=400&h=300&q=80",
        category: 0,
        featured: false,
        bestseller: false,
        new: false,
        popular: true,
        dietary: &["nut-free"],
    },
    DemoProduct {
        name: "Carrot Cake",
        slug: "carrot-cake",
        description: "Moist and flavorful carrot cake with walnuts and cream cheese frosting.",
        price: 2699,
        image: "https://images.unsplash.com/photo-1621303837174-89787a7d4729?auto=format&fit=crop&w=400&h=300&q=80",
        category: 0,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Chocolate Chip Cookies",
        slug: "chocolate-chip-cookies",
        description: "Soft, chewy cookies with generous chunks of premium chocolate and a hint of sea salt.",
        price: 1299,
        image: "https://images.unsplash.com/photo-1499636136210-6f4ee915583e?auto=format&fit=crop&w=600&h=400&q=80",
        category: 2,
        featured: true,
        bestseller: false,
        new: false,
        popular: true,
        dietary: &[],
    },
    DemoProduct {
        name: "Buttery Croissants",
        slug: "buttery-croissants",
        description: "Flaky, buttery layers with a golden exterior and soft, airy interior. Baked fresh every morning.",
        price: 399,
        image: "https://images.unsplash.com/photo-1555507036-ab1f4038808a?auto=format&fit=crop&w=600&h=400&q=80",
        category: 1,
        featured: true,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Sourdough Bread",
        slug: "sourdough-bread",
        description: "Artisan sourdough loaf with a crispy crust and soft interior.",
        price: 699,
        image: "https://images.pexels.com/photos/1387072/pexels-photo-1387072.jpeg?auto=compress&w=1260",
        category: 3,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &["vegan"],
    },
    DemoProduct {
        name: "French Macarons",
        slug: "french-macarons",
        description: "Delicate almond meringue cookies with ganache filling.",
        price: 1899,
        image: "https://images.unsplash.com/photo-1558326567-98ae2405596b?auto=format&fit=crop&w=400&h=300&q=80",
        category: 1,
        featured: false,
        bestseller: false,
        new: true,
        popular: false,
        dietary: &["gluten-free"],
    },
    DemoProduct {
        name: "Cinnamon Rolls",
        slug: "cinnamon-rolls",
        description: "Soft rolls with cinnamon-sugar filling and cream cheese frosting.",
        price: 1499,
        image: "https://images.unsplash.com/photo-1509365465985-25d11c17e812?auto=format&fit=crop&w=400&h=300&q=80",
        category: 1,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Baguette",
        slug: "baguette",
        description: "Traditional French baguette with a crispy crust and soft interior.",
        price: 499,
        image: "https://images.pexels.com/photos/1775043/pexels-photo-1775043.jpeg?auto=compress&w=1260",
        category: 3,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &["vegan"],
    },
    DemoProduct {
        name: "Shortbread Cookies",
        slug: "shortbread-cookies",
        description: "Buttery, crumbly traditional Scottish shortbread cookies.",
        price: 999,
        image: "https://images.pexels.com/photos/14000207/pexels-photo-14000207.jpeg?auto=compress&w=1260",
        category: 2,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Blueberry Muffins",
        slug: "blueberry-muffins",
        description: "Soft and fluffy muffins packed with fresh blueberries.",
        price: 1099,
        image: "https://images.pexels.com/photos/3724/food-morning-breakfast-orange-juice.jpg?auto=compress&w=1260",
        category: 1,
        featured: false,
        bestseller: false,
        new: true,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Sugar Cookies",
        slug: "sugar-cookies",
        description: "Classic sugar cookies with a soft center and slightly crisp edges.",
        price: 899,
        image: "https://images.pexels.com/photos/4686977/pexels-photo-4686977.jpeg?auto=compress&w=1260",
        category: 2,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &[],
    },
    DemoProduct {
        name: "Olive Focaccia",
        slug: "olive-focaccia",
        description: "Italian-style focaccia bread with olives and rosemary.",
        price: 799,
        image: "https://images.pexels.com/photos/6605308/pexels-photo-6605308.jpeg?auto=compress&w=1260",
        category: 3,
        featured: false,
        bestseller: false,
        new: false,
        popular: false,
        dietary: &["vegan"],
    },
    DemoProduct {
        name: "Chocolate Eclairs",
        slug: "chocolate-eclairs",
        description: "Light choux pastry filled with vanilla cream and topped with chocolate glaze.",
        price: 1699,
        image: "https://images.pexels.com/photos/6133457/pexels-photo-6133457.jpeg?auto=compress&w=1260",
        category: 1,
        featured: false,
        bestseller: false,
        new: false,
        popular: true,
        dietary: &[],
    },
];

/// Carrega o catálogo de demonstração se ainda não houver nenhuma categoria.
/// Retorna `true` quando algo foi inserido.
pub async fn seed_demo_catalog(store: &dyn Store) -> Result<bool, AppError> {
    if !store.list_categories().await?.is_empty() {
        return Ok(false);
    }

    let mut category_ids = Vec::with_capacity(DEMO_CATEGORIES.len());
    for (name, slug) in DEMO_CATEGORIES {
        let category = store
            .create_category(&CategoryInput {
                name: name.to_string(),
                slug: slug.to_string(),
            })
            .await?;
        category_ids.push(category.id);
    }

    for demo in DEMO_PRODUCTS {
        let input = ProductInput {
            slug: demo.slug.to_string(),
            name: demo.name.to_string(),
            description: demo.description.to_string(),
            price: Decimal::new(demo.price, 2),
            image: demo.image.to_string(),
            category_id: category_ids[demo.category],
            featured: demo.featured,
            is_bestseller: demo.bestseller,
            is_new: demo.new,
            is_popular: demo.popular,
            sizes: Vec::new(),
            colors: Vec::new(),
            dietary_options: demo.dietary.iter().map(|t| t.to_string()).collect(),
            stock: DEMO_STOCK,
        };
        store.create_product(&input).await?;
    }

    tracing::info!(
        categories = DEMO_CATEGORIES.len(),
        products = DEMO_PRODUCTS.len(),
        "Catálogo de demonstração carregado"
    );
    Ok(true)
}

/// Cria o super admin inicial, se o username ainda não existir.
/// A senha chega já em hash.
pub async fn seed_admin(
    store: &dyn Store,
    username: &str,
    email: &str,
    password_hash: String,
) -> Result<bool, AppError> {
    // Mesma normalização do cadastro pelo painel
    let username = username.trim();
    if store.find_user_by_username(username).await?.is_some() {
        return Ok(false);
    }

    store
        .create_user(&NewUser {
            username: username.to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            full_name: Some("Administrator".to_string()),
            role: Role::Admin,
            status: UserStatus::Active,
            is_admin: true,
            is_super_admin: true,
        })
        .await?;

    tracing::info!(username, "Super admin criado");
    Ok(true)
}
