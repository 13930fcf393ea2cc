pub mod condo_bill;
