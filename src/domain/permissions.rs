//! Role-permission table and access checks.
//!
//! Every `resource/action` pair a role may perform is listed here exactly
//! once. The request gate and the access introspection endpoints both read
//! from this table.

use crate::config::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_DELIVERY};

/// A `resource/action` pair guarded by the request gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub resource: &'static str,
    pub action: &'static str,
}

impl Permission {
    pub const fn new(resource: &'static str, action: &'static str) -> Self {
        Self { resource, action }
    }

    /// Whether `role` holds this permission.
    pub fn is_granted_to(&self, role: &str) -> bool {
        is_allowed(role, self.resource, self.action)
    }

    // === Users ===
    pub const USERS_LOGOUT: Permission = Permission::new("Users", "Logout");
    pub const USERS_INDEX: Permission = Permission::new("Users", "Index");
    pub const USERS_DETAILS: Permission = Permission::new("Users", "Details");
    pub const USERS_CREATE: Permission = Permission::new("Users", "Create");
    pub const USERS_EDIT: Permission = Permission::new("Users", "Edit");
    pub const USERS_DELETE: Permission = Permission::new("Users", "Delete");

    // === Home ===
    pub const HOME_PROFILE: Permission = Permission::new("Home", "Profile");
    pub const HOME_RESTAURANTS: Permission = Permission::new("Home", "Restaurants");
    pub const HOME_CATEGORIES: Permission = Permission::new("Home", "Categories");

    // === Catalog ===
    pub const RESTAURANTS_CREATE: Permission = Permission::new("Restaurants", "Create");
    pub const RESTAURANTS_EDIT: Permission = Permission::new("Restaurants", "Edit");
    pub const RESTAURANTS_DELETE: Permission = Permission::new("Restaurants", "Delete");
    pub const CATEGORIES_CREATE: Permission = Permission::new("Categories", "Create");
    pub const CATEGORIES_EDIT: Permission = Permission::new("Categories", "Edit");
    pub const CATEGORIES_DELETE: Permission = Permission::new("Categories", "Delete");
    pub const FOOD_ITEMS_CREATE: Permission = Permission::new("FoodItems", "Create");
    pub const FOOD_ITEMS_EDIT: Permission = Permission::new("FoodItems", "Edit");
    pub const FOOD_ITEMS_DELETE: Permission = Permission::new("FoodItems", "Delete");
    pub const FOOD_ITEMS_BY_CATEGORY: Permission = Permission::new("FoodItems", "BrowseByCategory");
    pub const FOOD_ITEMS_BY_RESTAURANT: Permission =
        Permission::new("FoodItems", "BrowseByRestaurant");

    // === Orders ===
    pub const ORDERS_INDEX: Permission = Permission::new("Orders", "Index");
    pub const ORDERS_CREATE: Permission = Permission::new("Orders", "Create");
    pub const ORDERS_TRACK: Permission = Permission::new("Orders", "TrackOrder");
    pub const ORDERS_DELETE: Permission = Permission::new("Orders", "Delete");
    pub const ORDERS_UPDATE_STATUS: Permission = Permission::new("Orders", "UpdateStatus");
    pub const ORDER_ITEMS_ADD: Permission = Permission::new("OrderItems", "AddToOrder");
    pub const ORDER_ITEMS_DELETE: Permission = Permission::new("OrderItems", "Delete");

    // === Fulfillment ===
    pub const DELIVERIES_INDEX: Permission = Permission::new("Deliveries", "Index");
    pub const DELIVERIES_TRACK: Permission = Permission::new("Deliveries", "TrackDelivery");
    pub const DELIVERIES_EDIT: Permission = Permission::new("Deliveries", "Edit");
    pub const DELIVERIES_ASSIGN: Permission = Permission::new("Deliveries", "AssignDelivery");
    pub const PAYMENTS_INDEX: Permission = Permission::new("Payments", "Index");
    pub const PAYMENTS_EDIT: Permission = Permission::new("Payments", "Edit");
    pub const PAYMENTS_CONFIRM: Permission = Permission::new("Payments", "ConfirmPayment");
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource, self.action)
    }
}

/// Customer permissions
pub const CUSTOMER_PERMISSIONS: &[&str] = &[
    "Users/Register",
    "Users/Login",
    "Users/Logout",
    "Orders/Create",
    "Orders/TrackOrder",
    "Payments/Create",
    "Home/Profile",
    "Home/Restaurants",
    "Home/Categories",
    "FoodItems/BrowseByCategory",
    "FoodItems/BrowseByRestaurant",
    "OrderItems/AddToOrder",
];

/// Delivery staff permissions
pub const DELIVERY_PERMISSIONS: &[&str] = &[
    "Users/Login",
    "Users/Logout",
    "Deliveries/TrackDelivery",
    "Home/Profile",
];

/// Administrator permissions: everything above plus catalog and fulfillment management
pub const ADMIN_PERMISSIONS: &[&str] = &[
    // === Account ===
    "Users/Register",
    "Users/Login",
    "Users/Logout",
    "Users/Index",
    "Users/Details",
    "Users/Create",
    "Users/Edit",
    "Users/Delete",
    // === Home ===
    "Home/Profile",
    "Home/Restaurants",
    "Home/Categories",
    // === Catalog ===
    "Restaurants/Create",
    "Restaurants/Edit",
    "Restaurants/Delete",
    "Categories/Create",
    "Categories/Edit",
    "Categories/Delete",
    "FoodItems/Create",
    "FoodItems/Edit",
    "FoodItems/Delete",
    "FoodItems/BrowseByCategory",
    "FoodItems/BrowseByRestaurant",
    // === Orders ===
    "Orders/Index",
    "Orders/Create",
    "Orders/Edit",
    "Orders/Delete",
    "Orders/TrackOrder",
    "Orders/UpdateStatus",
    "OrderItems/AddToOrder",
    "OrderItems/Delete",
    // === Fulfillment ===
    "Deliveries/Index",
    "Deliveries/Create",
    "Deliveries/Edit",
    "Deliveries/Delete",
    "Deliveries/TrackDelivery",
    "Deliveries/AssignDelivery",
    "Payments/Index",
    "Payments/Create",
    "Payments/Edit",
    "Payments/ConfirmPayment",
];

/// Get the permission set for a role name. Unknown roles get nothing.
pub fn permissions_for_role(role: &str) -> &'static [&'static str] {
    match role {
        ROLE_ADMIN => ADMIN_PERMISSIONS,
        ROLE_CUSTOMER => CUSTOMER_PERMISSIONS,
        ROLE_DELIVERY => DELIVERY_PERMISSIONS,
        _ => &[],
    }
}

/// Exact, case-sensitive role comparison.
pub fn has_role(session_role: &str, required_role: &str) -> bool {
    session_role == required_role
}

/// Whether `resource/action` is listed for `role`.
pub fn is_allowed(role: &str, resource: &str, action: &str) -> bool {
    let key = format!("{}/{}", resource, action);
    permissions_for_role(role).contains(&key.as_str())
}

/// Every `resource/action` pair `role` may perform.
pub fn allowed_actions(role: &str) -> Vec<String> {
    permissions_for_role(role)
        .iter()
        .map(|p| p.to_string())
        .collect()
}
